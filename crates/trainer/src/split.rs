//! Train/test split, stratified on the first label column

use alert_taxonomy::ALERT_COUNT;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices for each side of the split
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded, stratified split: each stratum of the first label contributes the
/// same fraction to the held-out set, so a rare first label does not vanish
/// from evaluation.
pub fn stratified_split(
    labels: &[[u8; ALERT_COUNT]],
    test_fraction: f64,
    seed: u64,
) -> SplitIndices {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut positives: Vec<usize> = Vec::new();
    let mut negatives: Vec<usize> = Vec::new();
    for (i, row) in labels.iter().enumerate() {
        if row[0] == 1 {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for stratum in [positives, negatives] {
        let mut stratum = stratum;
        stratum.shuffle(&mut rng);
        let take = ((stratum.len() as f64) * test_fraction).round() as usize;
        let take = take.min(stratum.len());
        test.extend_from_slice(&stratum[..take]);
        train.extend_from_slice(&stratum[take..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    SplitIndices { train, test }
}
