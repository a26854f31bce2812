use std::error::Error;
use std::fmt;

use bio_types::strand::ReqStrand;

/// Classification of a transcript sub-interval from the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubIntervalKind {
    Exon,
    Utr,
}

/// A typed region within a transcript's genomic span. Containment is
/// half-open-low, `start <= pos < stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubInterval {
    start: usize,
    stop: usize,
    kind: SubIntervalKind,
}

impl SubInterval {
    pub fn new(start: usize, stop: usize, kind: SubIntervalKind) -> Self {
        SubInterval { start, stop, kind }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn kind(&self) -> SubIntervalKind {
        self.kind
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.stop
    }
}

/// Selects which of the two alignment sources a coverage pass
/// accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSlot {
    First,
    Second,
}

impl SampleSlot {
    fn index(self) -> usize {
        match self {
            SampleSlot::First => 0,
            SampleSlot::Second => 1,
        }
    }
}

/// One splice variant: a genomic span on a chromosome, its typed
/// sub-intervals, and a per-base coverage array for each of the two
/// alignment sources. Coverage arrays are sized at construction and
/// never resized; all position-to-index conversions subtract `start`.
#[derive(Debug, Clone)]
pub struct Transcript {
    name: String,
    chromosome: u32,
    start: usize,
    stop: usize,
    strand: ReqStrand,
    subintervals: Vec<SubInterval>,
    coverage: [Vec<u32>; 2],
}

impl Transcript {
    pub fn new(
        name: String,
        chromosome: u32,
        start: usize,
        stop: usize,
        strand: ReqStrand,
    ) -> Result<Self, TranscriptError> {
        if stop < start {
            return Err(TranscriptError::InvertedSpan(name, start, stop));
        }

        let length = stop - start + 1;

        Ok(Transcript {
            name,
            chromosome,
            start,
            stop,
            strand,
            subintervals: Vec::new(),
            coverage: [vec![0; length], vec![0; length]],
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chromosome(&self) -> u32 {
        self.chromosome
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn strand(&self) -> ReqStrand {
        self.strand
    }

    pub fn strand_symbol(&self) -> char {
        match self.strand {
            ReqStrand::Forward => '+',
            ReqStrand::Reverse => '-',
        }
    }

    pub fn subintervals(&self) -> &[SubInterval] {
        &self.subintervals
    }

    pub fn coverage(&self, slot: SampleSlot) -> &[u32] {
        &self.coverage[slot.index()]
    }

    /// Length of the `[start, stop)` span in genomic positions.
    pub fn span_length(&self) -> usize {
        self.stop - self.start
    }

    pub fn add_sub_interval(&mut self, sub: SubInterval) {
        self.subintervals.push(sub);
    }

    /// True iff the chromosome matches, the position lies in
    /// `[start, stop)`, and at least one sub-interval covers it. A
    /// transcript with no sub-intervals contains nothing.
    pub fn contains(&self, chromosome: u32, pos: usize) -> bool {
        chromosome == self.chromosome
            && pos >= self.start
            && pos < self.stop
            && self.subintervals.iter().any(|sub| sub.contains(pos))
    }

    /// Adds one to the selected coverage array over the local index
    /// range `pos - start ..= pos - start + len`. Indices outside the
    /// array are skipped.
    pub fn add_coverage(&mut self, slot: SampleSlot, pos: usize, len: usize) {
        let cov = &mut self.coverage[slot.index()];
        let first = pos as isize - self.start as isize;

        for i in first..=first + len as isize {
            if i >= 0 && (i as usize) < cov.len() {
                cov[i as usize] += 1;
            }
        }
    }

    /// Maximum value across both coverage arrays.
    pub fn max_coverage(&self) -> u32 {
        self.coverage
            .iter()
            .flat_map(|cov| cov.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}subintervals",
            self.name,
            self.chromosome,
            self.start,
            self.stop,
            self.strand_symbol(),
            self.subintervals.len()
        )
    }
}

#[derive(Debug)]
pub enum TranscriptError {
    InvertedSpan(String, usize, usize),
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranscriptError::InvertedSpan(name, start, stop) => write!(
                f,
                "Transcript {}: stop {} before start {}",
                name, stop, start
            ),
        }
    }
}

impl Error for TranscriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Transcript {
        let mut trx = Transcript::new(
            "AT1G15530.1".to_string(),
            1,
            1000,
            1200,
            ReqStrand::Forward,
        )
        .unwrap();
        trx.add_sub_interval(SubInterval::new(1050, 1150, SubIntervalKind::Exon));
        trx
    }

    #[test]
    fn inverted_span_rejected() {
        assert!(Transcript::new("bad".to_string(), 1, 500, 400, ReqStrand::Forward).is_err());
    }

    #[test]
    fn containment() {
        let trx = transcript();

        assert!(trx.contains(1, 1050));
        assert!(trx.contains(1, 1149));
        assert!(!trx.contains(1, 1150));
        assert!(!trx.contains(1, 1049));
        assert!(!trx.contains(1, 999));
        assert!(!trx.contains(1, 1200));
        assert!(!trx.contains(2, 1050));
        assert!(!trx.contains(0, 1050));
    }

    #[test]
    fn containment_requires_sub_interval() {
        let bare = Transcript::new("bare".to_string(), 1, 1000, 1200, ReqStrand::Forward).unwrap();
        assert!(!bare.contains(1, 1100));
    }

    #[test]
    fn sub_interval_bounds() {
        let sub = SubInterval::new(100, 200, SubIntervalKind::Utr);
        assert!(sub.contains(100));
        assert!(sub.contains(199));
        assert!(!sub.contains(200));
        assert!(!sub.contains(99));
    }

    #[test]
    fn coverage_scenario() {
        let mut trx = transcript();

        trx.add_coverage(SampleSlot::First, 1060, 40);
        trx.add_coverage(SampleSlot::First, 1100, 20);

        let cov = trx.coverage(SampleSlot::First);
        assert_eq!(cov.len(), 201);
        assert_eq!(cov[59], 0);
        for i in 60..100 {
            assert_eq!(cov[i], 1, "index {}", i);
        }
        assert_eq!(cov[100], 2);
        for i in 101..=120 {
            assert_eq!(cov[i], 1, "index {}", i);
        }
        assert_eq!(cov[121], 0);
        assert_eq!(trx.max_coverage(), 2);

        assert!(trx.coverage(SampleSlot::Second).iter().all(|&c| c == 0));
    }

    #[test]
    fn coverage_clipped_to_array() {
        let mut trx = transcript();

        // extends past the end of the span
        trx.add_coverage(SampleSlot::First, 1190, 50);
        // starts before the span
        trx.add_coverage(SampleSlot::First, 980, 30);

        let cov = trx.coverage(SampleSlot::First);
        assert_eq!(cov[200], 1);
        for i in 0..=10 {
            assert_eq!(cov[i], 1, "index {}", i);
        }
        assert_eq!(cov[11], 0);
    }

    #[test]
    fn slots_are_independent() {
        let mut trx = transcript();

        trx.add_coverage(SampleSlot::First, 1100, 10);
        trx.add_coverage(SampleSlot::Second, 1100, 10);
        trx.add_coverage(SampleSlot::Second, 1100, 10);

        assert_eq!(trx.coverage(SampleSlot::First)[100], 1);
        assert_eq!(trx.coverage(SampleSlot::Second)[100], 2);
    }
}
