use crate::thumbnailer::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// `%(name)s` — a percent sign, a parenthesized field name, and the `s` type
/// specifier. Any strategy value containing one is treated as a manual
/// command template.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\(([^()]+)\)s").expect("placeholder pattern is valid"));

/// The resolved, executable form of a job: local inputs, a freshly allocated
/// scratch directory, and the effective conversion settings.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub local_paths: Vec<PathBuf>,
    /// Scratch directory the conversion writes into; its listing is the
    /// conversion's sole output artifact.
    pub output_dir: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: String,
    pub background: String,
    pub quality: u32,
    /// Conversion binary, already defaulted from configuration.
    pub command: String,
}

impl ConversionRequest {
    fn input(&self) -> Result<String, ConvertError> {
        self.local_paths
            .first()
            .map(|path| path.display().to_string())
            .ok_or_else(|| ConvertError::Template("localPaths[0]".to_string()))
    }

    fn dimensions(&self, strategy: &str) -> Result<(u32, u32), ConvertError> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(ConvertError::MissingDimensions { strategy: strategy.to_string() }),
        }
    }

    /// ` -quality {q}` when quality is set, empty otherwise. A zero quality
    /// must not surface as `-quality 0`.
    fn quality_flag(&self) -> String {
        if self.quality > 0 {
            format!(" -quality {}", self.quality)
        } else {
            String::new()
        }
    }

    fn output_file(&self) -> String {
        format!("{}/0.{}", self.output_dir.display(), self.format)
    }
}

/// The recipe for invoking the external conversion tool: one of the named
/// built-ins, or an operator-supplied command template carried in the job
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Flatten/trim a PDF-like input, one output file per page.
    Pdf,
    /// Resize and composite over a solid background canvas.
    Matted,
    /// Resize to fit within the box, aspect ratio preserved.
    Bounded,
    /// Resize to cover the box, then center-crop to exact dimensions.
    Fill,
    /// Force-resize to exact dimensions, aspect ratio ignored.
    Strict,
    /// The strategy value is itself the command template.
    Manual(String),
}

impl Strategy {
    /// Map a job's declared strategy to a variant. A value containing a
    /// placeholder is a manual template; anything else must name a built-in.
    pub fn resolve(strategy: &str) -> Result<Self, ConvertError> {
        if PLACEHOLDER.is_match(strategy) {
            return Ok(Strategy::Manual(strategy.to_string()));
        }
        match strategy {
            "pdf" => Ok(Strategy::Pdf),
            "matted" => Ok(Strategy::Matted),
            "bounded" => Ok(Strategy::Bounded),
            "fill" => Ok(Strategy::Fill),
            "strict" => Ok(Strategy::Strict),
            other => Err(ConvertError::StrategyNotFound(other.to_string())),
        }
    }

    /// Produce the shell command for one conversion. Pure: no filesystem or
    /// process side effects happen here.
    pub fn command_line(&self, request: &ConversionRequest) -> Result<String, ConvertError> {
        match self {
            Strategy::Pdf => {
                let input = request.input()?;
                Ok(format!(
                    "{} -fuzz 20% -transparent none -density 200 -trim \"{}\" -depth 8 \"{}/%d.{}\"",
                    request.command,
                    input,
                    request.output_dir.display(),
                    request.format,
                ))
            }
            Strategy::Matted => {
                let (width, height) = request.dimensions("matted")?;
                Ok(format!(
                    "{} \"{}[0]\" -resize {w}x{h} -size {w}x{h} xc:{} +swap -gravity center{} -composite \"{}\"",
                    request.command,
                    request.input()?,
                    request.background,
                    request.quality_flag(),
                    request.output_file(),
                    w = width,
                    h = height,
                ))
            }
            Strategy::Bounded => {
                let (width, height) = request.dimensions("bounded")?;
                Ok(format!(
                    "{} \"{}[0]\" -thumbnail {}x{}{} \"{}\"",
                    request.command,
                    request.input()?,
                    width,
                    height,
                    request.quality_flag(),
                    request.output_file(),
                ))
            }
            Strategy::Fill => {
                let (width, height) = request.dimensions("fill")?;
                Ok(format!(
                    "{} \"{}[0]\" -resize {w}x{h}^ -gravity center -extent {w}x{h}{} \"{}\"",
                    request.command,
                    request.input()?,
                    request.quality_flag(),
                    request.output_file(),
                    w = width,
                    h = height,
                ))
            }
            Strategy::Strict => {
                let (width, height) = request.dimensions("strict")?;
                Ok(format!(
                    "{} \"{}[0]\" -resize {}x{}!{} \"{}\"",
                    request.command,
                    request.input()?,
                    width,
                    height,
                    request.quality_flag(),
                    request.output_file(),
                ))
            }
            Strategy::Manual(template) => substitute(template, request),
        }
    }
}

/// Substitute every `%(name)s` placeholder in a manual template. Only the
/// allow-listed request fields may be referenced; anything else aborts the
/// conversion before a process is spawned.
fn substitute(template: &str, request: &ConversionRequest) -> Result<String, ConvertError> {
    let mut command = String::with_capacity(template.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(template) {
        let matched = captures.get(0).expect("capture 0 always exists");
        let name = &captures[1];
        command.push_str(&template[last..matched.start()]);
        command.push_str(&lookup(name, request)?);
        last = matched.end();
    }
    command.push_str(&template[last..]);
    Ok(command)
}

fn lookup(name: &str, request: &ConversionRequest) -> Result<String, ConvertError> {
    match name {
        "command" => Ok(request.command.clone()),
        "width" => request
            .width
            .map(|w| w.to_string())
            .ok_or_else(|| ConvertError::Template(name.to_string())),
        "height" => request
            .height
            .map(|h| h.to_string())
            .ok_or_else(|| ConvertError::Template(name.to_string())),
        "format" => Ok(request.format.clone()),
        "background" => Ok(request.background.clone()),
        "quality" => Ok(request.quality.to_string()),
        "convertedPath" => Ok(request.output_dir.display().to_string()),
        _ => {
            let index = name
                .strip_prefix("localPaths[")
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|index| index.parse::<usize>().ok())
                .ok_or_else(|| ConvertError::Template(name.to_string()))?;
            request
                .local_paths
                .get(index)
                .map(|path| path.display().to_string())
                .ok_or_else(|| ConvertError::Template(name.to_string()))
        }
    }
}
