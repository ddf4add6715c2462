use serde::{Deserialize, Serialize};

/// The like-related part of a video that an optimistic toggle rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikeSnapshot {
    pub liked: bool,
    pub like_count: u64,
}

impl LikeSnapshot {
    pub fn new(liked: bool, like_count: u64) -> Self {
        Self { liked, like_count }
    }

    /// Flip `liked` and move the count by one in the matching direction.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                like_count: self.like_count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                like_count: self.like_count.saturating_add(1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_moves_count_with_flag() {
        let liked = LikeSnapshot::new(false, 9).toggled();
        assert_eq!(liked, LikeSnapshot::new(true, 10));
        assert_eq!(liked.toggled(), LikeSnapshot::new(false, 9));
    }

    #[test]
    fn unlike_never_underflows() {
        assert_eq!(
            LikeSnapshot::new(true, 0).toggled(),
            LikeSnapshot::new(false, 0)
        );
    }
}
