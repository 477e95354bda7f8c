mod dry_run;
mod xdotool;
mod r#trait;

pub use self::r#trait::create_pointer_tracker;
