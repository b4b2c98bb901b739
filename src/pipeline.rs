//! Binarized image to decoded symbol.
//!
//! Stages, each reported in a `tracing` event: `searching` (finder scan and
//! triple grouping), `located` (corner assignment and dimension),
//! `sampled` (alignment refit and module grid) and `parsed`.

use crate::config::DecodeOptions;
use crate::decoder::QrDecoder;
use crate::detector::{self, DetectedSymbol, FinderDetector, FinderPattern, FinderTriple};
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, QRCode};
use crate::symbol::version::read_version_info;
use tracing::{debug, trace};

/// Module sizes within a triple may differ by this ratio in the strict pass
const STRICT_SIZE_RATIO: f32 = 1.2;
/// ... and by this ratio in the relaxed pass
const RELAXED_SIZE_RATIO: f32 = 1.4;
/// Largest |cos| of the corner angle accepted as a right angle
const MAX_CORNER_COS: f32 = 0.3;
/// Longer leg over shorter leg for the two finder-to-corner distances
const MAX_LEG_RATIO: f32 = 1.5;
/// Triples tried per image
const MAX_GROUPS: usize = 40;
/// Smallest dimension that carries version information
const VERSION_INFO_DIMENSION: usize = 45;

/// Assign corners to three finder candidates: the right-angle vertex is the
/// top-left and the cross product decides which of the others is top-right.
fn order_finder_patterns(
    a: &FinderPattern,
    b: &FinderPattern,
    c: &FinderPattern,
) -> Option<FinderTriple> {
    let patterns = [a, b, c];

    let mut best_idx = 0usize;
    let mut best_cos = f32::INFINITY;
    for i in 0..3 {
        let p = &patterns[i].center;
        let p1 = &patterns[(i + 1) % 3].center;
        let p2 = &patterns[(i + 2) % 3].center;

        let (v1x, v1y) = (p1.x - p.x, p1.y - p.y);
        let (v2x, v2y) = (p2.x - p.x, p2.y - p.y);
        let denom = v1x.hypot(v1y) * v2x.hypot(v2y);
        if denom == 0.0 {
            return None;
        }
        let cos = ((v1x * v2x + v1y * v2y) / denom).abs();
        if cos < best_cos {
            best_cos = cos;
            best_idx = i;
        }
    }
    if best_cos > MAX_CORNER_COS {
        return None;
    }

    let tl = patterns[best_idx];
    let p1 = patterns[(best_idx + 1) % 3];
    let p2 = patterns[(best_idx + 2) % 3];
    let (tr, bl) = if tl.center.cross(&p1.center, &p2.center) > 0.0 {
        (p1, p2)
    } else {
        (p2, p1)
    };

    let d_tr = tl.center.distance(&tr.center);
    let d_bl = tl.center.distance(&bl.center);
    if d_tr.max(d_bl) > d_tr.min(d_bl) * MAX_LEG_RATIO {
        return None;
    }

    Some(FinderTriple {
        top_left: tl.center,
        top_right: tr.center,
        bottom_left: bl.center,
        module_size: (tl.module_size + tr.module_size + bl.module_size) / 3.0,
    })
}

fn size_ratio(patterns: [&FinderPattern; 3]) -> f32 {
    let min = patterns
        .iter()
        .map(|p| p.module_size)
        .fold(f32::INFINITY, f32::min);
    let max = patterns.iter().map(|p| p.module_size).fold(0.0f32, f32::max);
    max / min
}

/// Lower is better: size agreement, squareness and confirmation strength
fn group_score(patterns: [&FinderPattern; 3], triple: &FinderTriple) -> f32 {
    let d_tr = triple.top_left.distance(&triple.top_right);
    let d_bl = triple.top_left.distance(&triple.bottom_left);
    let (vx, vy) = (
        triple.top_right.x - triple.top_left.x,
        triple.top_right.y - triple.top_left.y,
    );
    let (wx, wy) = (
        triple.bottom_left.x - triple.top_left.x,
        triple.bottom_left.y - triple.top_left.y,
    );
    let cos = ((vx * wx + vy * wy) / (d_tr * d_bl)).abs();
    let legs = d_tr.max(d_bl) / d_tr.min(d_bl);
    let hits: usize = patterns.iter().map(|p| p.count).sum();
    size_ratio(patterns) * 2.0 + legs + cos + 1.0 / hits as f32
}

/// Candidate triples, strict size agreement first, each tier best-scored first
pub(crate) fn group_finder_patterns(patterns: &[FinderPattern]) -> Vec<FinderTriple> {
    if patterns.len() < 3 {
        return Vec::new();
    }

    let mut scored: Vec<(bool, f32, FinderTriple)> = Vec::new();
    for i in 0..patterns.len() {
        for j in (i + 1)..patterns.len() {
            for k in (j + 1)..patterns.len() {
                let group = [&patterns[i], &patterns[j], &patterns[k]];
                let ratio = size_ratio(group);
                if ratio > RELAXED_SIZE_RATIO {
                    continue;
                }
                let Some(triple) = order_finder_patterns(group[0], group[1], group[2]) else {
                    continue;
                };
                // Finders of one symbol are at least seven modules apart
                let min_distance = triple
                    .top_left
                    .distance(&triple.top_right)
                    .min(triple.top_left.distance(&triple.bottom_left));
                if min_distance < triple.module_size * 7.0 || triple.dimension().is_none() {
                    continue;
                }
                scored.push((ratio > STRICT_SIZE_RATIO, group_score(group, &triple), triple));
            }
        }
    }

    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    scored.truncate(MAX_GROUPS);
    scored.into_iter().map(|(_, _, triple)| triple).collect()
}

/// Detect and decode one symbol in a binarized image. When several candidate
/// triples fail, the error that got furthest through the pipeline is returned.
pub(crate) fn decode_binary(binary: &BitMatrix, options: &DecodeOptions) -> Result<QRCode> {
    let mut finders = FinderDetector::detect(binary);
    finders.truncate(options.max_finder_candidates);
    let groups = group_finder_patterns(&finders);
    debug!(
        stage = "searching",
        finders = finders.len(),
        groups = groups.len(),
        "finder search complete"
    );

    let mut best = QrError::NotFound;
    for triple in &groups {
        match decode_triple(binary, triple, options) {
            Ok(qr) => return Ok(qr),
            Err(err) => {
                trace!(%err, "candidate triple rejected");
                if err.progress() > best.progress() {
                    best = err;
                }
            }
        }
    }
    Err(best)
}

fn sample(binary: &BitMatrix, triple: &FinderTriple) -> Result<DetectedSymbol> {
    let dimension = triple.dimension().ok_or(QrError::NotFound)?;
    debug!(
        stage = "located",
        dimension,
        module_size = triple.module_size,
        "finder triple ordered"
    );

    let symbol = detector::detect_symbol(binary, triple, dimension)?;
    if dimension < VERSION_INFO_DIMENSION {
        return Ok(symbol);
    }
    match read_version_info(&symbol.grid) {
        Some(version) if version.size() != dimension => {
            debug!(%version, estimated = dimension, "resampling at declared version");
            detector::detect_symbol(binary, triple, version.size())
        }
        _ => Ok(symbol),
    }
}

fn decode_triple(
    binary: &BitMatrix,
    triple: &FinderTriple,
    options: &DecodeOptions,
) -> Result<QRCode> {
    let symbol = sample(binary, triple)?;
    debug!(
        stage = "sampled",
        dimension = symbol.grid.width(),
        alignment = symbol.alignment.is_some(),
        "module grid sampled"
    );

    let (mut qr, mirrored) = match QrDecoder::decode_matrix(&symbol.grid) {
        Ok(qr) => (qr, false),
        Err(err @ (QrError::FormatInfoError | QrError::UncorrectableError { .. }))
            if options.try_mirrored =>
        {
            trace!(%err, "retrying as mirror image");
            match QrDecoder::decode_matrix(&symbol.grid.transpose()) {
                Ok(qr) => (qr, true),
                Err(_) => return Err(err),
            }
        }
        Err(err) => return Err(err),
    };

    let [tl, tr, br, bl] = symbol.corners;
    // The transposed grid swaps the roles of the top-right and bottom-left corners
    qr.position = if mirrored { [tl, bl, br, tr] } else { [tl, tr, br, bl] };
    qr.mirrored = mirrored;
    debug!(
        stage = "parsed",
        version = %qr.version,
        ec_level = ?qr.error_correction,
        mirrored,
        "symbol decoded"
    );
    Ok(qr)
}
