/// Format a raw byte count into a human-readable string: "12.5 MB"
pub fn fmt_bytes(bytes: u64) -> String {
    fmt_bytes_f(bytes as f64)
}

/// Bytes occupied by `blocks` cache blocks of `block_size` bytes.
pub fn fmt_blocks(blocks: u64, block_size: u64) -> String {
    fmt_bytes_f(blocks as f64 * block_size as f64)
}

fn fmt_bytes_f(b: f64) -> String {
    const TB: f64 = 1_099_511_627_776.0;
    const GB: f64 = 1_073_741_824.0;
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1_024.0;
    if b >= TB      { format!("{:.1} TB", b / TB) }
    else if b >= GB { format!("{:.1} GB", b / GB) }
    else if b >= MB { format!("{:.1} MB", b / MB) }
    else if b >= KB { format!("{:.1} KB", b / KB) }
    else            { format!("{:.0} B",  b) }
}

/// Group digits by thousands: 1234567 -> "1,234,567"
pub fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Operations per second: "1.2K/s"
pub fn fmt_ops_rate(ops: f64) -> String {
    if ops >= 1_000_000.0 { format!("{:.1}M/s", ops / 1_000_000.0) }
    else if ops >= 1_000.0 { format!("{:.1}K/s", ops / 1_000.0) }
    else { format!("{:.0}/s", ops) }
}

/// Format a percentage with one decimal: "84.5%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}
