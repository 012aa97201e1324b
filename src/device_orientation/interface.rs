/// Physical orientation of the device, raw values as reported by the motion sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// EXIF orientation of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrientation {
    Up = 1,
    UpMirrored = 2,
    Down = 3,
    DownMirrored = 4,
    LeftMirrored = 5,
    Right = 6,
    RightMirrored = 7,
    Left = 8,
}

impl DeviceOrientation {
    pub const ALL: [DeviceOrientation; 7] = [
        DeviceOrientation::Unknown,
        DeviceOrientation::Portrait,
        DeviceOrientation::PortraitUpsideDown,
        DeviceOrientation::LandscapeLeft,
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::FaceUp,
        DeviceOrientation::FaceDown,
    ];

    pub fn raw_value(self) -> u8 {
        match self {
            DeviceOrientation::Unknown => 0,
            DeviceOrientation::Portrait => 1,
            DeviceOrientation::PortraitUpsideDown => 2,
            DeviceOrientation::LandscapeLeft => 3,
            DeviceOrientation::LandscapeRight => 4,
            DeviceOrientation::FaceUp => 5,
            DeviceOrientation::FaceDown => 6,
        }
    }

    pub fn from_raw_value(raw: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|orientation| orientation.raw_value() == raw)
            .unwrap_or_default()
    }

    /// Orientation of a back camera buffer held in this device orientation.
    /// Flat or unknown poses give no usable orientation.
    pub fn image_orientation(self) -> Option<ImageOrientation> {
        match self {
            DeviceOrientation::Portrait => Some(ImageOrientation::Right),
            DeviceOrientation::PortraitUpsideDown => Some(ImageOrientation::Left),
            DeviceOrientation::LandscapeLeft => Some(ImageOrientation::Up),
            DeviceOrientation::LandscapeRight => Some(ImageOrientation::Down),
            DeviceOrientation::Unknown
            | DeviceOrientation::FaceUp
            | DeviceOrientation::FaceDown => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DeviceOrientation::Unknown => "Unknown",
            DeviceOrientation::Portrait => "Portrait",
            DeviceOrientation::PortraitUpsideDown => "Portrait (upside down)",
            DeviceOrientation::LandscapeLeft => "Landscape left",
            DeviceOrientation::LandscapeRight => "Landscape right",
            DeviceOrientation::FaceUp => "Face up",
            DeviceOrientation::FaceDown => "Face down",
        }
    }
}

pub trait OrientationSensor {
    fn orientation(&self) -> DeviceOrientation;
}
