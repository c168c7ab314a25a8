use chrono::{DateTime, Utc};

/// Human-readable age like "2 min ago", "yesterday", "3 weeks ago".
pub fn relative_time(dt: &DateTime<Utc>) -> String {
    relative_time_from(dt, Utc::now())
}

pub fn relative_time_from(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*dt);

    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    let mins = elapsed.num_minutes();
    if mins < 60 {
        return format!("{} min ago", mins);
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{} hr ago", hours);
    }
    match elapsed.num_days() {
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 35 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}
