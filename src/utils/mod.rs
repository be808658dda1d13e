use crate::models::{Effort, ElapsedTime};

/// Format seconds the way the leaderboard prints them.
/// 45 → "0:45" | 64 → "1:04" | 3723 → "1:02:03"
pub fn fmt_clock(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

pub fn fmt_elapsed(elapsed: &ElapsedTime) -> String {
    match elapsed {
        ElapsedTime::Seconds(secs) => format!("{} ({}s)", fmt_clock(*secs), secs),
        ElapsedTime::Unparsed(raw) => format!("unparsed {:?}", raw),
    }
}

/// One line of the printed leaderboard.
pub fn fmt_effort(position: usize, effort: &Effort) -> String {
    let rank = effort
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| format!("#{}", position + 1));
    format!(
        "{:>4}  {:<30} activity {:<12} {}",
        rank,
        effort.name,
        effort.activity_id.as_deref().unwrap_or("—"),
        fmt_elapsed(&effort.elapsed)
    )
}
