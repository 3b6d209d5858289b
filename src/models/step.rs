use rgb_pixmap::{Pixel, PixelBuffer, RasterError};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::error::PipelineError;

/// One transform in a pipeline job.
///
/// In YAML the variant is selected by `op`, with its parameters alongside:
///
/// ```yaml
/// - op: glow
///   threshold: 200
/// - op: add
///   with: trees
/// ```
///
/// Fields named `with` refer to a loaded image or to an earlier job's
/// `store_as` result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Resize {
        width: usize,
        height: usize,
    },
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Subimage {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Copy `with` into the current image at column `x`, row `y`
    Paste {
        with: String,
        x: usize,
        y: usize,
    },
    Fill {
        #[serde(deserialize_with = "deserialize_pixel")]
        color: Pixel,
    },
    Gamma {
        gamma: f32,
    },
    AlphaBlend {
        with: String,
        alpha: f32,
    },
    Grayscale,
    Add {
        with: String,
    },
    Subtract {
        with: String,
    },
    Multiply {
        with: String,
    },
    Difference {
        with: String,
    },
    Lightest {
        with: String,
    },
    Darkest {
        with: String,
    },
    Invert,
    Swirl,
    ExtractChannel {
        channel: u32,
    },
    ColorJitter {
        size: u8,
        #[serde(default)]
        seed: u64,
    },
    Blur,
    SobelEdge,
    ExtractWhite {
        threshold: u8,
    },
    Glow {
        threshold: u8,
    },
    BitMap,
    Bitmap {
        size: usize,
    },
}

fn deserialize_pixel<'de, D>(deserializer: D) -> Result<Pixel, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

impl Step {
    /// Operation name as written in pipeline files.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Resize { .. } => "resize",
            Step::FlipHorizontal => "flip_horizontal",
            Step::FlipVertical => "flip_vertical",
            Step::Rotate90 => "rotate90",
            Step::Subimage { .. } => "subimage",
            Step::Paste { .. } => "paste",
            Step::Fill { .. } => "fill",
            Step::Gamma { .. } => "gamma",
            Step::AlphaBlend { .. } => "alpha_blend",
            Step::Grayscale => "grayscale",
            Step::Add { .. } => "add",
            Step::Subtract { .. } => "subtract",
            Step::Multiply { .. } => "multiply",
            Step::Difference { .. } => "difference",
            Step::Lightest { .. } => "lightest",
            Step::Darkest { .. } => "darkest",
            Step::Invert => "invert",
            Step::Swirl => "swirl",
            Step::ExtractChannel { .. } => "extract_channel",
            Step::ColorJitter { .. } => "color_jitter",
            Step::Blur => "blur",
            Step::SobelEdge => "sobel_edge",
            Step::ExtractWhite { .. } => "extract_white",
            Step::Glow { .. } => "glow",
            Step::BitMap => "bit_map",
            Step::Bitmap { .. } => "bitmap",
        }
    }

    /// Name of the second image this step reads, if any.
    pub fn operand(&self) -> Option<&str> {
        match self {
            Step::Paste { with, .. }
            | Step::AlphaBlend { with, .. }
            | Step::Add { with }
            | Step::Subtract { with }
            | Step::Multiply { with }
            | Step::Difference { with }
            | Step::Lightest { with }
            | Step::Darkest { with } => Some(with),
            _ => None,
        }
    }

    /// Apply this step to `image`, resolving operands in `images`.
    pub fn apply(
        &self,
        image: &PixelBuffer,
        images: &HashMap<String, PixelBuffer>,
    ) -> Result<PixelBuffer, PipelineError> {
        let operand = || lookup(images, self.operand().unwrap_or_default());
        let raster = |source: RasterError| PipelineError::Raster {
            step: self.name().to_string(),
            source,
        };

        let result = match self {
            Step::Resize { width, height } => image.resize(*width, *height).map_err(raster)?,
            Step::FlipHorizontal => image.flip_horizontal(),
            Step::FlipVertical => image.flip_vertical(),
            Step::Rotate90 => image.rotate90(),
            Step::Subimage {
                x,
                y,
                width,
                height,
            } => image.subimage(*x, *y, *width, *height).map_err(raster)?,
            Step::Paste { x, y, .. } => {
                let mut pasted = image.clone();
                pasted.replace(operand()?, *x, *y);
                pasted
            }
            Step::Fill { color } => {
                let mut filled = image.clone();
                filled.fill(*color);
                filled
            }
            Step::Gamma { gamma } => image.gamma_correct(*gamma).map_err(raster)?,
            Step::AlphaBlend { alpha, .. } => {
                image.alpha_blend(operand()?, *alpha).map_err(raster)?
            }
            Step::Grayscale => image.grayscale(),
            Step::Add { .. } => image.add(operand()?).map_err(raster)?,
            Step::Subtract { .. } => image.subtract(operand()?).map_err(raster)?,
            Step::Multiply { .. } => image.multiply(operand()?).map_err(raster)?,
            Step::Difference { .. } => image.difference(operand()?).map_err(raster)?,
            Step::Lightest { .. } => image.lightest(operand()?).map_err(raster)?,
            Step::Darkest { .. } => image.darkest(operand()?).map_err(raster)?,
            Step::Invert => image.invert(),
            Step::Swirl => image.swirl(),
            Step::ExtractChannel { channel } => image.extract_channel(*channel),
            Step::ColorJitter { size, seed } => image.color_jitter(*size, *seed),
            Step::Blur => image.blur(),
            Step::SobelEdge => image.sobel_edge(),
            Step::ExtractWhite { threshold } => image.extract_white(*threshold),
            Step::Glow { threshold } => image.glow(*threshold),
            Step::BitMap => image.bit_map(),
            Step::Bitmap { size } => image.bitmap(*size).map_err(raster)?,
        };
        Ok(result)
    }
}

fn lookup<'a>(
    images: &'a HashMap<String, PixelBuffer>,
    name: &str,
) -> Result<&'a PixelBuffer, PipelineError> {
    images
        .get(name)
        .ok_or_else(|| PipelineError::UnknownImage(name.to_string()))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseStepError {
    #[error("unknown operation '{0}'")]
    UnknownOp(String),

    #[error("operation '{0}' needs a value, e.g. {0}={1}")]
    MissingValue(String, &'static str),

    #[error("operation '{0}' takes no value")]
    UnexpectedValue(String),

    #[error("invalid value '{value}' for '{op}'")]
    InvalidValue { op: String, value: String },

    #[error("operation '{0}' combines two images; use a pipeline file")]
    NeedsOperand(String),
}

impl FromStr for Step {
    type Err = ParseStepError;

    /// Parse the command-line form of a single-image step.
    ///
    /// `NAME` or `NAME=VALUE`, where dashes and underscores are
    /// interchangeable: `grayscale`, `sobel-edge`, `glow=200`,
    /// `resize=320x200`, `fill=#ff8800`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (s.trim(), None),
        };
        let op = name.to_ascii_lowercase().replace('-', "_");

        let invalid = || ParseStepError::InvalidValue {
            op: op.clone(),
            value: value.unwrap_or_default().to_string(),
        };
        let required = |example: &'static str| {
            value.ok_or_else(|| ParseStepError::MissingValue(op.clone(), example))
        };
        let no_value = |step: Step| match value {
            Some(_) => Err(ParseStepError::UnexpectedValue(op.clone())),
            None => Ok(step),
        };

        match op.as_str() {
            "flip_horizontal" => no_value(Step::FlipHorizontal),
            "flip_vertical" => no_value(Step::FlipVertical),
            "rotate90" => no_value(Step::Rotate90),
            "grayscale" => no_value(Step::Grayscale),
            "invert" => no_value(Step::Invert),
            "swirl" => no_value(Step::Swirl),
            "blur" => no_value(Step::Blur),
            "sobel_edge" => no_value(Step::SobelEdge),
            "bit_map" => no_value(Step::BitMap),
            "resize" => {
                let (w, h) = required("320x200")?.split_once('x').ok_or_else(invalid)?;
                Ok(Step::Resize {
                    width: w.parse().map_err(|_| invalid())?,
                    height: h.parse().map_err(|_| invalid())?,
                })
            }
            "fill" => Ok(Step::Fill {
                color: required("#ff8800")?.parse().map_err(|_| invalid())?,
            }),
            "gamma" => Ok(Step::Gamma {
                gamma: required("2.2")?.parse().map_err(|_| invalid())?,
            }),
            "extract_channel" => Ok(Step::ExtractChannel {
                channel: required("1")?.parse().map_err(|_| invalid())?,
            }),
            "color_jitter" => Ok(Step::ColorJitter {
                size: required("16")?.parse().map_err(|_| invalid())?,
                seed: 0,
            }),
            "extract_white" => Ok(Step::ExtractWhite {
                threshold: required("200")?.parse().map_err(|_| invalid())?,
            }),
            "glow" => Ok(Step::Glow {
                threshold: required("200")?.parse().map_err(|_| invalid())?,
            }),
            "bitmap" => Ok(Step::Bitmap {
                size: required("8")?.parse().map_err(|_| invalid())?,
            }),
            "paste" | "alpha_blend" | "add" | "subtract" | "multiply" | "difference"
            | "lightest" | "darkest" => Err(ParseStepError::NeedsOperand(op.clone())),
            _ => Err(ParseStepError::UnknownOp(name.to_string())),
        }
    }
}
