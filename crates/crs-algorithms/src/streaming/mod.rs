pub mod agm;
pub mod count_min;
pub mod hyperloglog;
pub mod lsh;
pub mod minhash;

pub use agm::{AgmEstimator, AgmInput, AgmOutput, AgmSketch};
pub use count_min::{CountMinEstimator, CountMinInput, CountMinOutput, CountMinSketch};
pub use hyperloglog::{HyperLogLog, HyperLogLogCounter, HyperLogLogInput, HyperLogLogOutput};
pub use lsh::{Lsh, LshIndexer, LshInput, LshOutput};
pub use minhash::{MinHash, MinHashEstimator, MinHashInput, MinHashOutput};
