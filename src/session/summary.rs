/// Final-score bands: 100% perfect, at least 80% excellent, at least 60%
/// good, anything lower needs review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultBand {
    Perfect,
    Excellent,
    Good,
    NeedsReview,
}

impl ResultBand {
    pub fn for_score(score: u32, total: u32) -> Self {
        let (score, total) = (u64::from(score), u64::from(total));
        if total == 0 {
            ResultBand::NeedsReview
        } else if score >= total {
            ResultBand::Perfect
        } else if score * 100 >= total * 80 {
            ResultBand::Excellent
        } else if score * 100 >= total * 60 {
            ResultBand::Good
        } else {
            ResultBand::NeedsReview
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultBand::Perfect => "Perfect! An outstanding result!",
            ResultBand::Excellent => "Excellent! A very good result!",
            ResultBand::Good => "Good result! Keep it up!",
            ResultBand::NeedsReview => "A little more review is needed. Keep going!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultSummary {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub band: ResultBand,
}

impl ResultSummary {
    pub fn new(score: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            f64::from(score) * 100.0 / f64::from(total)
        };
        Self {
            score,
            total,
            percentage,
            band: ResultBand::for_score(score, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds() {
        assert_eq!(ResultBand::for_score(5, 5), ResultBand::Perfect);
        assert_eq!(ResultBand::for_score(4, 5), ResultBand::Excellent);
        assert_eq!(ResultBand::for_score(8, 10), ResultBand::Excellent);
        assert_eq!(ResultBand::for_score(79, 100), ResultBand::Good);
        assert_eq!(ResultBand::for_score(3, 5), ResultBand::Good);
        assert_eq!(ResultBand::for_score(59, 100), ResultBand::NeedsReview);
        assert_eq!(ResultBand::for_score(0, 3), ResultBand::NeedsReview);
        assert_eq!(ResultBand::for_score(0, 0), ResultBand::NeedsReview);
    }

    #[test]
    fn thirds_do_not_round_up() {
        // 2/3 is 66.7%: good, not excellent
        assert_eq!(ResultBand::for_score(2, 3), ResultBand::Good);
        assert_eq!(ResultBand::for_score(1, 3), ResultBand::NeedsReview);
    }

    #[test]
    fn summary_percentage() {
        let summary = ResultSummary::new(3, 4);
        assert!((summary.percentage - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.band, ResultBand::Good);
        assert_eq!(ResultSummary::new(0, 0).percentage, 0.0);
    }
}
