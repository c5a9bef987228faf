//! Mora count without materialising a boundary index.

use crate::context::Context;
use crate::error::Error;
use crate::normalize::normalize;
use crate::segment::segment;

/// Normalises and segments `s`, returning only the mora count.
pub fn count_all(ctx: &Context, s: &str, ignore: bool) -> Result<u32, Error> {
    let normalized = normalize(ctx, s, !ignore)?;
    let (boundaries, warning) = segment(&normalized)?;
    if !ignore {
        if let Some(w) = warning {
            tracing::warn!(warning = ?w, "count_all");
        }
    }
    Ok(boundaries.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_morae_without_boundaries() {
        let ctx = Context::new();
        assert_eq!(count_all(&ctx, "キャッキャ", false).unwrap(), 3);
    }
}
