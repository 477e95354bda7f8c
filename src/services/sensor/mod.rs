mod dwell_sensor;
mod executor;
mod r#trait;

pub use self::r#trait::{create_sensor_factory, Sensor, SensorFactory, SensorSpec};
