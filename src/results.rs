//! Result screen table
//!
//! Final score bands, each with one image and a few comments to pick from at random.

use rand::Rng;

/// One score band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultPack {
    pub min: u64,
    /// Inclusive upper bound; `None` for the open-ended top band
    pub max: Option<u64>,
    pub img: &'static str,
    pub comments: &'static [&'static str],
}

impl ResultPack {
    pub fn contains(&self, score: u64) -> bool {
        score >= self.min && self.max.is_none_or(|max| score <= max)
    }

    /// Random comment for this band
    pub fn pick_comment<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        if self.comments.is_empty() {
            return "";
        }
        self.comments[rng.random_range(0..self.comments.len())]
    }
}

/// Bands in ascending order, non-overlapping, last one open-ended
pub static RESULT_PACKS: [ResultPack; 6] = [
    ResultPack {
        min: 0,
        max: Some(100),
        img: "./assets/result/0-100.png",
        comments: &[
            "手先とか不器用な感じ？",
            "ウォーミングアップだよね，さすがに",
            "そろそろ利き手使おうか",
        ],
    },
    ResultPack {
        min: 101,
        max: Some(200),
        img: "./assets/result/101-200.png",
        comments: &[
            "おい，笑える",
            "逆に才能あるよ...w",
            "それでよく挑んだね，このゲーム",
        ],
    },
    ResultPack {
        min: 201,
        max: Some(300),
        img: "./assets/result/201-300.png",
        comments: &[
            "そろそろ本気でやろっか",
            "もう帰っていいですか？",
            "君のプレイ，眠たくなるね",
        ],
    },
    ResultPack {
        min: 301,
        max: Some(400),
        img: "./assets/result/301-400.png",
        comments: &["なかなかやるじゃん？", "その調子，その調子", "見ぃつけた"],
    },
    ResultPack {
        min: 401,
        max: Some(500),
        img: "./assets/result/401-500.png",
        comments: &[
            "最近ちょっと太った？",
            "鼻の下，ニキビできてるよ",
            "やっと2人きりになれたね？",
        ],
    },
    ResultPack {
        min: 501,
        max: None,
        img: "./assets/result/501plus.png",
        comments: &["よし，妻にしてやるえ", "2億で買うえ"],
    },
];

/// Band a final score falls in
pub fn lookup(score: u64) -> Option<&'static ResultPack> {
    RESULT_PACKS.iter().find(|pack| pack.contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_band_edges() {
        assert_eq!(lookup(0).map(|p| p.min), Some(0));
        assert_eq!(lookup(100).map(|p| p.min), Some(0));
        assert_eq!(lookup(101).map(|p| p.min), Some(101));
        assert_eq!(lookup(500).map(|p| p.min), Some(401));
        assert_eq!(lookup(501).map(|p| p.min), Some(501));
        assert_eq!(lookup(1_000_000).map(|p| p.img), Some("./assets/result/501plus.png"));
    }

    #[test]
    fn test_bands_are_contiguous() {
        for pair in RESULT_PACKS.windows(2) {
            let max = pair[0].max.expect("only the last band is open-ended");
            assert_eq!(pair[1].min, max + 1);
        }
        assert!(RESULT_PACKS.last().is_some_and(|p| p.max.is_none()));
    }

    #[test]
    fn test_pick_comment_from_band() {
        let mut rng = Pcg32::seed_from_u64(9);
        let pack = lookup(250).unwrap();
        for _ in 0..20 {
            assert!(pack.comments.contains(&pack.pick_comment(&mut rng)));
        }
    }
}
