//! Built-in demo feed.

use chrono::{DateTime, TimeZone, Utc};

use rf_core::feed::{Creator, MusicInfo, Video, VideoStats};
use rf_core::ids::VideoId;

const MEDIA_BASE: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";

struct Row {
    id: &'static str,
    file: &'static str,
    title: &'static str,
    description: &'static str,
    creator: &'static str,
    verified: bool,
    stats: (u64, u64, u64, u64),
    music: Option<(&'static str, &'static str)>,
    duration_secs: u32,
    created_day: u32,
}

const ROWS: &[Row] = &[
    Row {
        id: "1",
        file: "BigBuckBunny.mp4",
        title: "Amazing Dance Moves",
        description: "Late night rehearsal, first take #dance #fyp",
        creator: "dancequeen23",
        verified: true,
        stats: (12_500, 234, 89, 45_000),
        music: Some(("Upbeat Dance Track", "DJ Awesome")),
        duration_secs: 15,
        created_day: 15,
    },
    Row {
        id: "2",
        file: "ElephantsDream.mp4",
        title: "Cooking Hack",
        description: "Two ingredients, five minutes #cooking #food",
        creator: "chefmaster",
        verified: false,
        stats: (8_900, 156, 67, 23_000),
        music: Some(("Kitchen Vibes", "Cooking Beats")),
        duration_secs: 22,
        created_day: 14,
    },
    Row {
        id: "3",
        file: "ForBiggerBlazes.mp4",
        title: "Pet Tricks",
        description: "He finally learned it #pets #dogs",
        creator: "petlover99",
        verified: false,
        stats: (15_600, 445, 123, 67_000),
        music: None,
        duration_secs: 18,
        created_day: 13,
    },
    Row {
        id: "4",
        file: "ForBiggerEscapes.mp4",
        title: "Travel Vlog",
        description: "Side streets nobody told us about #travel",
        creator: "wanderlust_sarah",
        verified: true,
        stats: (9_800, 189, 95, 34_000),
        music: Some(("Adventure Awaits", "Travel Tunes")),
        duration_secs: 28,
        created_day: 12,
    },
    Row {
        id: "5",
        file: "ForBiggerFun.mp4",
        title: "DIY Craft",
        description: "Paper, glue, one afternoon #diy #craft",
        creator: "crafty_hands",
        verified: false,
        stats: (6_700, 98, 45, 18_000),
        music: Some(("Creative Flow", "Artsy Beats")),
        duration_secs: 25,
        created_day: 11,
    },
    Row {
        id: "6",
        file: "ForBiggerJoyrides.mp4",
        title: "Fitness Challenge",
        description: "Thirty seconds, no breaks #fitness #challenge",
        creator: "fitnessguru",
        verified: true,
        stats: (18_200, 312, 156, 52_000),
        music: Some(("Pump It Up", "Workout Beats")),
        duration_secs: 30,
        created_day: 10,
    },
];

fn created_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The demo feed, newest first.
pub fn sample_videos() -> Vec<Video> {
    ROWS.iter()
        .map(|row| {
            let (likes, comments, shares, views) = row.stats;
            Video {
                id: VideoId::from(row.id),
                url: format!("{MEDIA_BASE}/{}", row.file),
                thumbnail_url: format!("https://picsum.photos/400/600?random={}", row.id),
                title: row.title.to_string(),
                description: row.description.to_string(),
                creator: Creator {
                    username: row.creator.to_string(),
                    avatar_url: format!("https://picsum.photos/100/100?random={}", row.id),
                    verified: row.verified,
                },
                stats: VideoStats {
                    likes,
                    comments,
                    shares,
                    views: Some(views),
                },
                music: row.music.map(|(title, artist)| MusicInfo {
                    title: title.to_string(),
                    artist: artist.to_string(),
                }),
                duration_secs: row.duration_secs,
                created_at: created_at(row.created_day),
            }
        })
        .collect()
}
