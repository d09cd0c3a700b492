pub mod health;
pub mod object_events;
pub mod video_upload;
