//! Resolves the LightField XML footer into a frame decode plan.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::{Result, SpeError};
use crate::types::descriptor::{
    AttrValue, FrameDescriptor, MetadataFieldDescriptor, RegionDescriptor,
};
use crate::types::plan::{FrameDecodePlan, PlanEntry};
use crate::types::settings::AcquisitionSettings;

#[derive(Clone, Copy)]
enum AttrKind {
    Int,
    Text,
}

/// Attributes carried by one metadata element, besides `type` and
/// `bitDepth`.
struct MetadataSchema {
    tag: &'static str,
    extras: &'static [(&'static str, AttrKind)],
}

static METADATA_SCHEMAS: &[MetadataSchema] = &[
    MetadataSchema {
        tag: "TimeStamp",
        extras: &[
            ("event", AttrKind::Text),
            ("resolution", AttrKind::Int),
            ("absoluteTime", AttrKind::Text),
        ],
    },
    MetadataSchema {
        tag: "FrameTrackingNumber",
        extras: &[],
    },
    MetadataSchema {
        tag: "GateTracking",
        extras: &[("component", AttrKind::Text), ("monotonic", AttrKind::Text)],
    },
    MetadataSchema {
        tag: "ModulationTracking",
        extras: &[("component", AttrKind::Text), ("monotonic", AttrKind::Text)],
    },
];

const EXPERIMENT: &[&str] = &["DataHistories", "DataHistory", "Origin", "Experiment"];
const CAMERA: &[&str] = &["Devices", "Cameras", "Camera"];

/// Parses footer text into an XML document.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    Document::parse(text).map_err(|e| SpeError::Format(format!("malformed XML footer: {e}")))
}

/// Parses the footer and builds its frame decode plan.
pub fn resolve(text: &str) -> Result<FrameDecodePlan> {
    resolve_document(&parse_document(text)?)
}

/// Builds one plan entry per `Frame` data block, in document order.
pub fn resolve_document(doc: &Document) -> Result<FrameDecodePlan> {
    let data_formats: Vec<Node> = doc
        .descendants()
        .filter(|n| n.has_tag_name("DataFormat"))
        .collect();
    if data_formats.is_empty() {
        return Err(SpeError::Format("footer has no DataFormat element".into()));
    }

    let meta_blocks = meta_blocks(doc);

    let mut entries = Vec::new();
    for data_format in data_formats {
        for frame_node in data_blocks(data_format, "Frame") {
            let frame = read_frame(frame_node)?;
            let regions = data_blocks(frame_node, "Region")
                .map(read_region)
                .collect::<Result<Vec<_>>>()?;

            let mut metadata = Vec::new();
            for id in &frame.metadata_format_ids {
                match meta_blocks.iter().find(|block| block.attribute("id") == Some(id.as_str())) {
                    Some(block) => {
                        for child in block.children().filter(Node::is_element) {
                            metadata.push(read_metadata_field(child)?);
                        }
                    }
                    None => debug!(id = %id, "metadata format id matches no MetaBlock"),
                }
            }

            entries.push(PlanEntry {
                frame,
                regions,
                metadata,
            });
        }
    }

    let plan = FrameDecodePlan::new(entries);
    debug!(entries = plan.len(), frames = plan.frame_count(), "resolved frame decode plan");
    Ok(plan)
}

/// `MetaBlock` elements of the first `MetaFormat` collection.
fn meta_blocks<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.has_tag_name("MetaFormat"))
        .map(|format| {
            format
                .descendants()
                .filter(|n| n.has_tag_name("MetaBlock"))
                .collect()
        })
        .unwrap_or_default()
}

fn data_blocks<'a, 'input>(
    parent: Node<'a, 'input>,
    block_type: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .descendants()
        .skip(1)
        .filter(move |n| n.has_tag_name("DataBlock") && n.attribute("type") == Some(block_type))
}

fn required<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        SpeError::Format(format!(
            "<{}> is missing required attribute `{name}`",
            node.tag_name().name()
        ))
    })
}

fn parse_int<T: std::str::FromStr>(node: Node, name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        SpeError::Format(format!(
            "<{}> attribute `{name}` is not an integer: {raw:?}",
            node.tag_name().name()
        ))
    })
}

fn required_int<T: std::str::FromStr>(node: Node, name: &str) -> Result<T> {
    parse_int(node, name, required(node, name)?)
}

fn optional_int<T: std::str::FromStr>(node: Node, name: &str) -> Result<Option<T>> {
    node.attribute(name)
        .map(|raw| parse_int(node, name, raw))
        .transpose()
}

fn read_frame(node: Node) -> Result<FrameDescriptor> {
    let metadata_format_ids: Vec<String> = node
        .attribute("metaFormat")
        .map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(FrameDescriptor::builder()
        .count(required_int(node, "count")?)
        .byte_size(required_int(node, "size")?)
        .maybe_byte_stride(optional_int(node, "stride")?)
        .metadata_format_ids(metadata_format_ids)
        .pixel_type_name(required(node, "pixelFormat")?.to_string())
        .maybe_calibrations(node.attribute("calibrations").map(String::from))
        .build())
}

fn read_region(node: Node) -> Result<RegionDescriptor> {
    Ok(RegionDescriptor::builder()
        .width(required_int(node, "width")?)
        .height(required_int(node, "height")?)
        .byte_size(required_int(node, "size")?)
        .maybe_byte_stride(optional_int(node, "stride")?)
        .maybe_calibrations(node.attribute("calibrations").map(String::from))
        .build())
}

fn read_metadata_field(node: Node) -> Result<MetadataFieldDescriptor> {
    let tag = node.tag_name().name();
    let schema = METADATA_SCHEMAS
        .iter()
        .find(|schema| schema.tag == tag)
        .ok_or_else(|| SpeError::Format(format!("unsupported metadata element <{tag}>")))?;

    let attributes = schema
        .extras
        .iter()
        .filter_map(|&(name, kind)| {
            node.attribute(name).map(|raw| {
                let value = match kind {
                    AttrKind::Int => AttrValue::parse(raw),
                    AttrKind::Text => AttrValue::Text(raw.to_string()),
                };
                (name.to_string(), value)
            })
        })
        .collect();

    Ok(MetadataFieldDescriptor::builder()
        .tag_name(tag)
        .type_name(required(node, "type")?)
        .maybe_bit_depth(optional_int(node, "bitDepth")?)
        .attributes(attributes)
        .build())
}

/// Text of the first element reached by following `path`, each step a
/// descendant search below the previous one.
fn text_at(doc: &Document, path: &[&[&str]]) -> Option<String> {
    let mut node = doc.root();
    for name in path.iter().flat_map(|segment| segment.iter()) {
        node = node.descendants().skip(1).find(|n| n.has_tag_name(*name))?;
    }
    node.text().map(|text| text.trim().to_string())
}

/// Reads the acquisition settings recorded in the footer's data history.
pub fn read_settings(doc: &Document) -> AcquisitionSettings {
    let (exposure_started, exposure_ended) = exposure_events(doc);

    AcquisitionSettings::builder()
        .maybe_exposure_time(text_at(doc, &[EXPERIMENT, CAMERA, &["ShutterTiming", "ExposureTime"]]))
        .maybe_analog_gain(text_at(doc, &[EXPERIMENT, CAMERA, &["Adc", "AnalogGain"]]))
        .maybe_adc_speed(text_at(doc, &[EXPERIMENT, CAMERA, &["Adc", "Speed"]]))
        .maybe_frame_rate(text_at(doc, &[EXPERIMENT, CAMERA, &["Acquisition", "FrameRate"]]))
        .maybe_temperature_set_point(text_at(
            doc,
            &[EXPERIMENT, CAMERA, &["Sensor", "Temperature", "SetPoint"]],
        ))
        .maybe_temperature_reading(text_at(
            doc,
            &[EXPERIMENT, CAMERA, &["Sensor", "Temperature", "Reading"]],
        ))
        .maybe_background_file(text_at(
            doc,
            &[EXPERIMENT, &["OnlineCorrections", "BackgroundCorrection", "ReferenceFile"]],
        ))
        .maybe_readout_time(text_at(doc, &[EXPERIMENT, CAMERA, &["ReadoutControl", "Time"]]))
        .maybe_frames_per_readout(text_at(
            doc,
            &[EXPERIMENT, CAMERA, &["Acquisition", "FramesPerReadout"]],
        ))
        .maybe_exposure_started(exposure_started)
        .maybe_exposure_ended(exposure_ended)
        .build()
}

/// `absoluteTime` of the exposure start and end time stamps in the first
/// `MetaBlock`. Later events of the same kind overwrite earlier ones.
fn exposure_events(doc: &Document) -> (Option<String>, Option<String>) {
    let mut started = None;
    let mut ended = None;

    let Some(block) = meta_blocks(doc).into_iter().next() else {
        return (started, ended);
    };
    for stamp in block.descendants().filter(|n| n.has_tag_name("TimeStamp")) {
        let time = stamp.attribute("absoluteTime").map(String::from);
        match stamp.attribute("event") {
            Some("ExposureStarted") => started = time,
            Some("ExposureEnded") => ended = time,
            Some(other) => debug!(event = other, "ignoring time stamp event"),
            None => {}
        }
    }
    (started, ended)
}
