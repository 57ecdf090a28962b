//! Row-parallel iteration with or without rayon.
//!
//! With the `parallel` feature this is rayon's prelude. Without it, a
//! sequential `into_par_iter` stands in so classifiers keep a single code
//! path; the rest of the chain then resolves to plain `Iterator` methods.
//! Only adaptors shared by both (`map`, `flat_map`, `collect`) may be used.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
