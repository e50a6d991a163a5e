// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_source(lines: usize) -> String {
    let base = [
        "fn main() {\n",
        "\tlet value = 42;\u{200b}\n",
        "\tprintln!(\"{}\u{7}\", value);\n",
        "\t// stray escape \u{1b}[0m here\n",
        "}\n",
        "\n",
    ];
    base.iter().cycle().take(lines).copied().collect()
}

/// Byte range of `count` lines starting at line `first`.
#[allow(dead_code)]
pub fn window(doc: &special_chars_engine::RopeDocument, first: usize, count: usize) -> std::ops::Range<usize> {
    doc.offset_of_line(first)..doc.offset_of_line(first + count)
}
