//! Acquisition settings recorded in a LightField footer.

use bon::Builder;
use serde::Serialize;

/// Camera and experiment settings as recorded by the acquisition software.
///
/// Values are kept as the footer's text. Any of them may be absent,
/// depending on the camera model and software version that wrote the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
pub struct AcquisitionSettings {
    /// Exposure time per frame, in ms.
    pub exposure_time: Option<String>,
    pub analog_gain: Option<String>,
    /// A/D conversion rate, in MHz.
    pub adc_speed: Option<String>,
    pub frame_rate: Option<String>,
    pub temperature_set_point: Option<String>,
    pub temperature_reading: Option<String>,
    /// Reference file used for online background correction.
    pub background_file: Option<String>,
    /// Time to read out one frame, in ms.
    pub readout_time: Option<String>,
    pub frames_per_readout: Option<String>,
    /// `absoluteTime` of the last `ExposureStarted` time stamp in the first MetaBlock.
    pub exposure_started: Option<String>,
    /// `absoluteTime` of the last `ExposureEnded` time stamp in the first MetaBlock.
    pub exposure_ended: Option<String>,
}

fn number(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

impl AcquisitionSettings {
    pub fn exposure_time_ms(&self) -> Option<f64> {
        number(&self.exposure_time)
    }

    pub fn readout_time_ms(&self) -> Option<f64> {
        number(&self.readout_time)
    }

    pub fn frame_rate_hz(&self) -> Option<f64> {
        number(&self.frame_rate)
    }

    pub fn sensor_temperature(&self) -> Option<f64> {
        number(&self.temperature_reading)
    }

    pub fn frames_per_readout_count(&self) -> Option<u64> {
        self.frames_per_readout
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
    }
}
