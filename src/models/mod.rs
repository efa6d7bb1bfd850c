pub mod event;
pub mod event_type;
pub mod location;
pub mod status_view;
