// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character classification helpers for glyph resolution.

/// Pairs of bidi mirrored characters, sorted by the first element.
///
/// Covers the bracket and quotation pairs that occur in practice;
/// characters without an entry mirror to themselves.
const MIRROR_PAIRS: &[(u32, u32)] = &[
    (0x0028, 0x0029), // ( )
    (0x0029, 0x0028),
    (0x003C, 0x003E), // < >
    (0x003E, 0x003C),
    (0x005B, 0x005D), // [ ]
    (0x005D, 0x005B),
    (0x007B, 0x007D), // { }
    (0x007D, 0x007B),
    (0x00AB, 0x00BB), // « »
    (0x00BB, 0x00AB),
    (0x2039, 0x203A), // ‹ ›
    (0x203A, 0x2039),
    (0x2045, 0x2046),
    (0x2046, 0x2045),
    (0x207D, 0x207E),
    (0x207E, 0x207D),
    (0x208D, 0x208E),
    (0x208E, 0x208D),
    (0x2208, 0x220B), // ∈ ∋
    (0x2209, 0x220C),
    (0x220A, 0x220D),
    (0x220B, 0x2208),
    (0x220C, 0x2209),
    (0x220D, 0x220A),
    (0x221F, 0x2BFE),
    (0x2264, 0x2265), // ≤ ≥
    (0x2265, 0x2264),
    (0x226A, 0x226B),
    (0x226B, 0x226A),
    (0x2282, 0x2283), // ⊂ ⊃
    (0x2283, 0x2282),
    (0x2286, 0x2287),
    (0x2287, 0x2286),
    (0x2308, 0x2309), // ⌈ ⌉
    (0x2309, 0x2308),
    (0x230A, 0x230B), // ⌊ ⌋
    (0x230B, 0x230A),
    (0x2329, 0x232A),
    (0x232A, 0x2329),
    (0x2768, 0x2769),
    (0x2769, 0x2768),
    (0x276A, 0x276B),
    (0x276B, 0x276A),
    (0x276C, 0x276D),
    (0x276D, 0x276C),
    (0x276E, 0x276F),
    (0x276F, 0x276E),
    (0x2770, 0x2771),
    (0x2771, 0x2770),
    (0x2772, 0x2773),
    (0x2773, 0x2772),
    (0x2774, 0x2775),
    (0x2775, 0x2774),
    (0x27E6, 0x27E7),
    (0x27E7, 0x27E6),
    (0x27E8, 0x27E9), // ⟨ ⟩
    (0x27E9, 0x27E8),
    (0x27EA, 0x27EB),
    (0x27EB, 0x27EA),
    (0x2983, 0x2984),
    (0x2984, 0x2983),
    (0x2985, 0x2986),
    (0x2986, 0x2985),
    (0x2BFE, 0x221F),
    (0x3008, 0x3009), // 〈 〉
    (0x3009, 0x3008),
    (0x300A, 0x300B), // 《 》
    (0x300B, 0x300A),
    (0x300C, 0x300D),
    (0x300D, 0x300C),
    (0x300E, 0x300F),
    (0x300F, 0x300E),
    (0x3010, 0x3011),
    (0x3011, 0x3010),
    (0x3014, 0x3015),
    (0x3015, 0x3014),
    (0x3016, 0x3017),
    (0x3017, 0x3016),
    (0x3018, 0x3019),
    (0x3019, 0x3018),
    (0x301A, 0x301B),
    (0x301B, 0x301A),
    (0xFE59, 0xFE5A),
    (0xFE5A, 0xFE59),
    (0xFE5B, 0xFE5C),
    (0xFE5C, 0xFE5B),
    (0xFE5D, 0xFE5E),
    (0xFE5E, 0xFE5D),
    (0xFF08, 0xFF09),
    (0xFF09, 0xFF08),
    (0xFF1C, 0xFF1E),
    (0xFF1E, 0xFF1C),
    (0xFF3B, 0xFF3D),
    (0xFF3D, 0xFF3B),
    (0xFF5B, 0xFF5D),
    (0xFF5D, 0xFF5B),
    (0xFF5F, 0xFF60),
    (0xFF60, 0xFF5F),
    (0xFF62, 0xFF63),
    (0xFF63, 0xFF62),
];

/// CJK ideograph and symbol ranges, inclusive, sorted by start.
const CJK_RANGES: &[(u32, u32)] = &[
    (0x2E80, 0x2EF3),   // CJK radicals supplement
    (0x2F00, 0x2FD5),   // Kangxi radicals
    (0x2FF0, 0x2FFB),   // ideographic description characters
    (0x3000, 0x303F),   // CJK symbols and punctuation
    (0x3100, 0x312F),   // Bopomofo
    (0x3190, 0x319F),   // Kanbun
    (0x31A0, 0x31BF),   // Bopomofo extended
    (0x31C0, 0x31E3),   // CJK strokes
    (0x3200, 0x33FF),   // enclosed CJK letters, CJK compatibility
    (0x3400, 0x4DBF),   // CJK unified ideographs extension A
    (0x4E00, 0x9FFF),   // CJK unified ideographs
    (0xF900, 0xFAFF),   // CJK compatibility ideographs
    (0xFE30, 0xFE4F),   // CJK compatibility forms
    (0xFF00, 0xFFEF),   // halfwidth and fullwidth forms
    (0x20000, 0x2A6DF), // CJK unified ideographs extension B
    (0x2F800, 0x2FA1F), // CJK compatibility ideographs supplement
];

/// Returns the bidi mirrored counterpart of the given codepoint, or the
/// codepoint itself when it has none.
pub fn mirrored(codepoint: u32) -> u32 {
    match MIRROR_PAIRS.binary_search_by_key(&codepoint, |&(from, _)| from) {
        Ok(index) => MIRROR_PAIRS[index].1,
        Err(_) => codepoint,
    }
}

/// Returns `true` for CJK ideographs and the symbols and punctuation
/// conventionally set with them.
pub fn is_cjk_ideograph_or_symbol(codepoint: u32) -> bool {
    let index = CJK_RANGES.partition_point(|&(start, _)| start <= codepoint);
    index != 0 && codepoint <= CJK_RANGES[index - 1].1
}

/// Maps the given codepoint to its uppercase form when that form is a
/// single codepoint, otherwise returns it unchanged.
pub fn uppercase(codepoint: u32) -> u32 {
    let Some(c) = char::from_u32(codepoint) else {
        return codepoint;
    };
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(first), None) => first as u32,
        _ => codepoint,
    }
}
