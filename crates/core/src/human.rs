/// Compact trend-volume label: 842, 1.2K, 3.4M, 1.1B.
pub fn human_count(n: impl Into<u64>) -> String {
    let mut v: f64 = n.into() as f64;
    let units = ["", "K", "M", "B"];
    let mut u = 0;
    while v >= 1000.0 && u < units.len() - 1 {
        v /= 1000.0;
        u += 1;
    }
    if u == 0 {
        format!("{}", v as u64)
    } else {
        format!("{:.1}{}", v, units[u])
    }
}
