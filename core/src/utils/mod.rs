//! Shared helpers
//!
//! String handling for SQL literals and display, plus timing of pipeline
//! stages.

pub mod string;

pub use string::StringUtils;

use std::time::Instant;
use log::debug;

/// Measure execution time of a closure
pub fn measure_time<F, T>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    debug!("{} took {}ms", name, elapsed.as_millis());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_time() {
        let rows = measure_time("normalize", || vec![1, 2, 3]);
        assert_eq!(rows.len(), 3);
    }
}
