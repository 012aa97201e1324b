use crate::device_orientation::interface::{DeviceOrientation, OrientationSensor};
use std::sync::atomic::{AtomicU8, Ordering};

/// Orientation set by hand, from tests or from the GUI picker.
pub struct OrientationSensorFake {
    raw: AtomicU8,
}

impl OrientationSensorFake {
    pub fn new(orientation: DeviceOrientation) -> Self {
        Self {
            raw: AtomicU8::new(orientation.raw_value()),
        }
    }

    pub fn set(&self, orientation: DeviceOrientation) {
        self.raw.store(orientation.raw_value(), Ordering::SeqCst);
    }
}

impl OrientationSensor for OrientationSensorFake {
    fn orientation(&self) -> DeviceOrientation {
        DeviceOrientation::from_raw_value(self.raw.load(Ordering::SeqCst))
    }
}
