pub mod backend_api;
pub mod coach_matcher;
pub mod recommendation_scorer;
pub mod schedule_utils;
pub mod scheduling_service;
pub mod slot_generator;
