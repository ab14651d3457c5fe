//! The fixed 95-entry keyword table a `:keyword` command (opcode 64) indexes
//! into. Order is load-bearing — it is the wire format. Ported verbatim from
//! `original_source/sab2html/binary_graphics.py`'s `BINARY_GRAPHICS_KEYWORDS`.

pub const KEYWORDS: [&str; 95] = [
    ":bevel", ":butt", ":miter", ":none", ":round", ":square",
    ":draw", ":erase", ":flip",
    ":baseline", ":bottom", ":center", ":left", ":right", ":top",
    ":anti-cyclic", ":clamped", ":cyclic", ":relaxed",
    ":non-zero", ":odd-even",
    ":alu", ":attachment-x", ":attachment-y", ":character-style",
    ":clockwise", ":closed", ":copy-image",
    ":dash-pattern", ":scale-dashes", ":dashed", ":draw-end-point",
    ":draw-partial-dashes", ":end-angle",
    ":end-relaxation", ":end-slope-dx", ":end-slope-dy", ":filled",
    ":gray-level", ":handedness", ":image-bottom",
    ":image-left", ":image-right", ":image-top", ":initial-dash-phase",
    ":inner-x-radius", ":inner-y-radius",
    ":join-to-path", ":line-end-shape", ":line-joint-shape", ":mask",
    ":new-value", ":number-of-samples", ":opaque",
    ":pattern", ":points-are-convex-p", ":start-angle",
    ":start-relaxation", ":start-slope-dx", ":start-slope-dy",
    ":stretch-p", ":thickness", ":toward-x", ":toward-y", ":winding-rule",
    ":scale-thickness", ":character-size", ":string-width",
    ":scale-down-allowed", ":mask-x", ":mask-y",
    ":color", ":stipple", ":tile", ":shape", ":record-as-text",
    ":scan-conversion-mode",
    ":round-coordinates", ":center-circles", ":host-allowed", ":sketch",
    ":flatness",
    ":object", ":type", ":single-box", ":allow-sensitive-inferiors",
];

pub fn lookup(index: u8) -> Option<&'static str> {
    KEYWORDS.get(index as usize).copied()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_95_entries() {
        assert_eq!(KEYWORDS.len(), 95);
        assert_eq!(KEYWORDS[0], ":bevel");
        assert_eq!(KEYWORDS[94], ":allow-sensitive-inferiors");
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(lookup(95), None);
    }
}
