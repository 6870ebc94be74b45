use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

/// Prefix for raw extracted frames
pub const RAW_PREFIX: &str = "frame-";
/// Prefix for processed (inpainted) frames. Shares the staging directory
/// with raw frames; the prefix is what keeps re-runs from mistaking output
/// for input.
pub const PROCESSED_PREFIX: &str = "processed-frame-";
/// Suffix appended to diagnostic mask file stems
pub const MASK_SUFFIX: &str = "_mask";

const FRAME_EXT: &str = "png";
const INDEX_WIDTH: usize = 4;

/// Pipeline stage an artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Frame as extracted from the source video
    Raw,
    /// Frame after detection and inpainting
    Processed,
    /// Binary mask written alongside diagnostics output
    DiagnosticMask,
}

/// A staged frame file, identified by stage and sequence index.
///
/// Filename-sorted order of artifacts of one kind is the temporal order of
/// the frames; the zero-padded index field guarantees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub kind: ArtifactKind,
    pub index: u32,
    pub path: PathBuf,
}

/// Filename for a raw frame, e.g. `frame-0001.png`
pub fn raw_frame_name(index: u32) -> String {
    format!("{}{:0width$}.{}", RAW_PREFIX, index, FRAME_EXT, width = INDEX_WIDTH)
}

/// Filename for a processed frame, e.g. `processed-frame-0001.png`
pub fn processed_frame_name(index: u32) -> String {
    format!("{}{:0width$}.{}", PROCESSED_PREFIX, index, FRAME_EXT, width = INDEX_WIDTH)
}

/// Filename for a diagnostic mask, e.g. `frame-0001_mask.png`
pub fn diagnostic_mask_name(index: u32) -> String {
    format!("{}{:0width$}{}.{}", RAW_PREFIX, index, MASK_SUFFIX, FRAME_EXT, width = INDEX_WIDTH)
}

/// Output pattern handed to the external extraction tool
pub fn raw_frame_pattern() -> String {
    format!("{}%0{}d.{}", RAW_PREFIX, INDEX_WIDTH, FRAME_EXT)
}

/// Parse a staged filename back into its kind and index.
///
/// Returns `None` for files that do not follow the staging convention, so
/// foreign files in the staging directory are ignored rather than
/// misordered.
pub fn parse_artifact_name(file_name: &str) -> Option<(ArtifactKind, u32)> {
    let stem = file_name.strip_suffix(&format!(".{}", FRAME_EXT))?;

    if let Some(rest) = stem.strip_prefix(PROCESSED_PREFIX) {
        return parse_index(rest).map(|index| (ArtifactKind::Processed, index));
    }
    if let Some(rest) = stem.strip_prefix(RAW_PREFIX) {
        if let Some(body) = rest.strip_suffix(MASK_SUFFIX) {
            return parse_index(body).map(|index| (ArtifactKind::DiagnosticMask, index));
        }
        return parse_index(rest).map(|index| (ArtifactKind::Raw, index));
    }
    None
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.len() < INDEX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// List staged artifacts of one kind in filename-sorted order.
pub fn list_artifacts(dir: &Path, kind: ArtifactKind) -> Result<Vec<StagedArtifact>> {
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if let Some((parsed_kind, index)) = parse_artifact_name(&file_name) {
            if parsed_kind == kind {
                artifacts.push(StagedArtifact {
                    kind,
                    index,
                    path: entry.path().to_path_buf(),
                });
            }
        }
    }

    artifacts.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(artifacts)
}

/// Path of the processed counterpart of a raw artifact, in the same
/// staging directory.
pub fn processed_path_for(raw: &StagedArtifact) -> PathBuf {
    let dir = raw.path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(processed_frame_name(raw.index))
}
