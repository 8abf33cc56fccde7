//! Binary header layouts for both SPE variants.

use bon::Builder;
use serde::Serialize;

use crate::types::primitive::PrimitiveTag::{self, *};
use crate::types::schema::{FieldSpec, StructureSchema};

const fn f(name: &'static str, count: usize, tag: PrimitiveTag) -> FieldSpec {
    FieldSpec::primitive(name, count, tag)
}

/// A region of interest in the legacy header (12 bytes).
pub static ROI_SCHEMA: StructureSchema = StructureSchema::new(
    "roi",
    &[
        f("startx", 1, U16),
        f("endx", 1, U16),
        f("groupx", 1, U16),
        f("starty", 1, U16),
        f("endy", 1, U16),
        f("groupy", 1, U16),
    ],
);

/// Axis calibration block of the legacy header (489 bytes).
pub static CALIBRATION_SCHEMA: StructureSchema = StructureSchema::new(
    "calibration",
    &[
        f("offset", 1, F64),
        f("factor", 1, F64),
        f("current_unit", 1, Char),
        f("reserved1", 1, Char),
        f("string", 40, Char),
        f("reserved2", 40, Char),
        f("calib_valid", 1, Char),
        f("input_unit", 1, Char),
        f("polynom_unit", 1, Char),
        f("polynom_order", 1, I8),
        f("calib_count", 1, Char),
        f("pixel_position", 10, F64),
        f("calib_value", 10, F64),
        f("polynom_coeff", 6, F64),
        f("laser_position", 1, F64),
        f("reserved3", 1, Char),
        f("new_calib_flag", 1, U8),
        f("calib_label", 81, Char),
        f("expansion", 87, Char),
    ],
);

/// One 80-character comment line.
pub static COMMENT_SCHEMA: StructureSchema =
    StructureSchema::new("comment", &[f("comment", 80, Char)]);

/// The complete WinSpec 2.x header. Decodes to exactly
/// [`LEGACY_HEADER_SIZE`](crate::utils::misc::LEGACY_HEADER_SIZE) bytes.
pub static LEGACY_HEADER_SCHEMA: StructureSchema = StructureSchema::new(
    "winspec_header",
    &[
        f("ControllerVersion", 1, I16),
        f("LogicOutput", 1, I16),
        f("AmpHiCapLowNoise", 1, U16),
        f("xDimDet", 1, U16),
        f("mode", 1, I16),
        f("exp_sec", 1, F32),
        f("VChipXdim", 1, I16),
        f("VChipYdim", 1, I16),
        f("yDimDet", 1, U16),
        f("date", 10, Char),
        f("VirtualChipFlag", 1, I16),
        f("Spare_1", 2, I8),
        f("noscan", 1, I16),
        f("DetTemperature", 1, F32),
        f("DetType", 1, I16),
        f("xdim", 1, U16),
        f("stdiode", 1, I16),
        f("DelayTime", 1, F32),
        f("ShutterControl", 1, U16),
        f("AbsorbLive", 1, I16),
        f("AbsorbMode", 1, U16),
        f("CanDoVirtualChipFlag", 1, I16),
        f("ThresholdMinLive", 1, I16),
        f("ThresholdMinVal", 1, F32),
        f("ThresholdMaxLive", 1, I16),
        f("ThresholdMaxVal", 1, F32),
        f("SpecAutoSpectroMode", 1, I16),
        f("SpecCenterWlNm", 1, F32),
        f("SpecGlueFlag", 1, I16),
        f("SpecGlueStartWlNm", 1, F32),
        f("SpecGlueEndWlNm", 1, F32),
        f("SpecGlueMinOvrlpNm", 1, F32),
        f("SpecGlueFinalResNm", 1, F32),
        f("PulserType", 1, I16),
        f("CustomChipFlag", 1, I16),
        f("XPrePixels", 1, I16),
        f("XPostPixels", 1, I16),
        f("YPrePixels", 1, I16),
        f("YPostPixels", 1, I16),
        f("asynen", 1, I16),
        f("datatype", 1, I16),
        f("PulserMode", 1, I16),
        f("PulserOnChipAccums", 1, U16),
        f("PulserRepeatExp", 1, U32),
        f("PulseRepWidth", 1, F32),
        f("PulseRepDelay", 1, F32),
        f("PulseSeqStartWidth", 1, F32),
        f("PulseSeqEndWidth", 1, F32),
        f("PulseSeqStartDelay", 1, F32),
        f("PulseSeqEndDelay", 1, F32),
        f("PulseSeqIncMode", 1, I16),
        f("PImaxUsed", 1, I16),
        f("PImaxMode", 1, I16),
        f("PImaxGain", 1, I16),
        f("BackGrndApplied", 1, I16),
        f("PImax2nsBrdUsed", 1, I16),
        f("minblk", 1, U16),
        f("numminblk", 1, U16),
        f("SpecMirrorLocation", 2, I16),
        f("SpecSlitLocation", 4, I16),
        f("CustomTimingFlag", 1, I16),
        f("ExperimentTimeLocal", 7, Char),
        f("ExperimentTimeUTC", 7, Char),
        f("ExposUnits", 1, I16),
        f("ADCoffset", 1, U16),
        f("ADCrate", 1, U16),
        f("ADCtype", 1, U16),
        f("ADCresolution", 1, U16),
        f("ADCbitAdjust", 1, U16),
        f("gain", 1, U16),
        FieldSpec::nested("Comments", 5, &COMMENT_SCHEMA),
        f("geometric", 1, U16),
        f("xlabel", 16, Char),
        f("cleans", 1, U16),
        f("NumSkpPerCln", 1, U16),
        f("SpecMirrorPos", 2, I16),
        f("SpecSlitPos", 4, F32),
        f("AutoCleansActive", 1, I16),
        f("UseContCleansInst", 1, I16),
        f("AbsorbStripNum", 1, I16),
        f("SpecSlitPosUnits", 1, I16),
        f("SpecGrooves", 1, F32),
        f("srccmp", 1, I16),
        f("ydim", 1, U16),
        f("scramble", 1, I16),
        f("ContinuousCleansFlag", 1, I16),
        f("ExternalTriggerFlag", 1, I16),
        f("lnoscan", 1, I32),
        f("lavgexp", 1, I32),
        f("ReadoutTime", 1, F32),
        f("TriggeredModeFlag", 1, I16),
        f("Spare_2", 10, I8),
        f("sw_version", 16, Char),
        f("type", 1, I16),
        f("flatFieldApplied", 1, I16),
        f("Spare_3", 16, I8),
        f("kin_trig_mode", 1, I16),
        f("dlabel", 16, Char),
        f("Spare_4", 436, I8),
        f("PulseFileName", 120, Char),
        f("AbsorbFileName", 120, Char),
        f("NumExpRepeats", 1, U32),
        f("NumExpAccums", 1, U32),
        f("YT_Flag", 1, I16),
        f("clkspd_us", 1, F32),
        f("HWaccumFlag", 1, I16),
        f("StoreSync", 1, I16),
        f("BlemishApplied", 1, I16),
        f("CosmicApplied", 1, I16),
        f("CosmicType", 1, I16),
        f("CosmicThreshold", 1, F32),
        f("NumFrames", 1, I32),
        f("MaxIntensity", 1, F32),
        f("MinIntensity", 1, F32),
        f("ylabel", 16, Char),
        f("ShutterType", 1, U16),
        f("shutterComp", 1, F32),
        f("readoutMode", 1, U16),
        f("WindowSize", 1, U16),
        f("clkspd", 1, U16),
        f("interface_type", 1, U16),
        f("NumROIsInExperiment", 1, I16),
        f("Spare_5", 16, I8),
        f("controllerNum", 1, U16),
        f("SWmade", 1, U16),
        f("NumROI", 1, I16),
        FieldSpec::nested("ROI", 10, &ROI_SCHEMA),
        f("FlatField", 120, Char),
        f("background", 120, Char),
        f("blemish", 120, Char),
        f("file_header_ver", 1, F32),
        f("YT_INFO", 1000, Char),
        f("WinView_id", 1, I32),
        FieldSpec::nested("x_calibration", 1, &CALIBRATION_SCHEMA),
        FieldSpec::nested("y_calibration", 1, &CALIBRATION_SCHEMA),
        f("Istring", 40, Char),
        f("Spare_6", 25, I8),
        f("SpecType", 1, U8),
        f("SpecModel", 1, U8),
        f("PulseBurstUsed", 1, U8),
        f("PulseBurstCount", 1, U32),
        f("PulseBurstPeriod", 1, F64),
        f("PulseBracketUsed", 1, U8),
        f("PulseBracketType", 1, U8),
        f("PulseTimeConstFast", 1, F64),
        f("PulseAmplitudeFast", 1, F64),
        f("PulseTimeConstSlow", 1, F64),
        f("PulseAmplitudeSlow", 1, F64),
        f("AnalogGain", 1, I16),
        f("AvGainUsed", 1, I16),
        f("AvGain", 1, I16),
        f("lastvalue", 1, I16),
    ],
);

/// Frame geometry pulled from a decoded legacy header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
    pub frame_count: usize,
    pub pixel_type: PrimitiveTag,
}

impl FrameGeometry {
    /// Bytes occupied by one frame in the stream.
    pub fn frame_bytes(&self) -> usize {
        self.width * self.height * self.pixel_type.width()
    }

    /// End offset of the last frame, or `None` if it overflows.
    pub fn stream_end(&self, start: usize) -> Option<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(self.pixel_type.width()))
            .and_then(|frame| frame.checked_mul(self.frame_count))
            .and_then(|len| len.checked_add(start))
    }
}

/// The individually addressed fields of a LightField (SPE 3.x) header.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct SparseHeader {
    pub file_header_ver: f32,
    pub xml_footer_offset: u64,
    pub datatype: i16,
    pub xdim: u16,
    pub ydim: u16,
    pub num_frames: i32,
    pub x_dim_det: u16,
    pub y_dim_det: u16,
    pub noscan: i16,
    pub lnoscan: i32,
    pub scramble: i16,
    pub winview_id: i32,
    pub lastvalue: i16,
}
