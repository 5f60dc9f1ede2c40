//! The three quadratic in-place sorts. They sort ascending and log the slice after every pass at
//! trace level, which makes them handy for watching the algorithms work with `ORDTREE_LOG=trace`.
//!
//! # Examples
//!
//! ```
//! use ordtree::sort::insertion_sort;
//!
//! let mut xs = [64, 34, 25, 12, 22, 90, 11];
//! insertion_sort(&mut xs);
//!
//! assert_eq!(xs, [11, 12, 22, 25, 34, 64, 90]);
//! ```

use std::fmt;

use tracing::trace;

/// Repeatedly moves the smallest remaining element to the front of the unsorted part.
pub fn selection_sort<T>(xs: &mut [T])
where
    T: Ord + fmt::Debug,
{
    for i in 0..xs.len() {
        let mut min = i;
        for j in i + 1..xs.len() {
            if xs[j] < xs[min] {
                min = j;
            }
        }
        xs.swap(i, min);
        trace!(pass = i, ?xs, "selection sort");
    }
}

/// Swaps adjacent out-of-order pairs until a pass makes no swap.
pub fn bubble_sort<T>(xs: &mut [T])
where
    T: Ord + fmt::Debug,
{
    for i in 0..xs.len().saturating_sub(1) {
        let mut swapped = false;
        for j in 0..xs.len() - i - 1 {
            if xs[j] > xs[j + 1] {
                xs.swap(j, j + 1);
                swapped = true;
            }
        }
        trace!(pass = i, ?xs, "bubble sort");
        if !swapped {
            break;
        }
    }
}

/// Grows a sorted prefix by sliding each next element left past every larger one.
pub fn insertion_sort<T>(xs: &mut [T])
where
    T: Ord + fmt::Debug,
{
    for i in 1..xs.len() {
        let mut j = i;
        while j > 0 && xs[j - 1] > xs[j] {
            xs.swap(j - 1, j);
            j -= 1;
        }
        trace!(pass = i, ?xs, "insertion sort");
    }
}
