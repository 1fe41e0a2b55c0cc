//! Enumeration of variable/cut combinations.
//!
//! A [`Choice`] pairs `depth` distinct covariates (ascending) with one cut
//! index each. [`ChoiceSet::enumerate`] lists every choice exactly once and
//! gives it a dense id; the score table stores `2^depth` scores per id.
//!
//! # Order
//!
//! Variable combinations come out in lexicographic order, e.g. for depth 2
//! over three variables: `(0,1)`, `(0,2)`, `(1,2)`. Within a combination the
//! cut tuples are in row-major order with the last dimension varying fastest.
//! The order only depends on `depth` and the cut counts, so an id always maps
//! back to the same rule.

use super::config::Depth;

/// One composite rule skeleton: `depth` (variable, cut) pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Choice {
    depth: u8,
    vars: [u32; Depth::MAX],
    cuts: [u32; Depth::MAX],
}

impl Choice {
    /// Build a choice from parallel variable and cut slices.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length, are longer than
    /// [`Depth::MAX`], or the variables are not strictly increasing.
    pub fn new(vars: &[usize], cuts: &[usize]) -> Self {
        assert_eq!(vars.len(), cuts.len(), "vars and cuts must have equal length");
        assert!(vars.len() <= Depth::MAX, "choice deeper than {}", Depth::MAX);
        assert!(
            vars.windows(2).all(|w| w[0] < w[1]),
            "choice variables must be strictly increasing: {vars:?}"
        );

        let mut choice = Self {
            depth: vars.len() as u8,
            vars: [0; Depth::MAX],
            cuts: [0; Depth::MAX],
        };
        for (d, (&v, &c)) in vars.iter().zip(cuts).enumerate() {
            choice.vars[d] = v as u32;
            choice.cuts[d] = c as u32;
        }
        choice
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    #[inline]
    pub fn vars(&self) -> &[u32] {
        &self.vars[..self.depth()]
    }

    #[inline]
    pub fn cuts(&self) -> &[u32] {
        &self.cuts[..self.depth()]
    }

    /// `(variable, cut)` per dimension, in rule order.
    #[inline]
    pub fn dims(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vars()
            .iter()
            .zip(self.cuts())
            .map(|(&v, &c)| (v as usize, c as usize))
    }
}

// =============================================================================
// Enumeration
// =============================================================================

/// Visit every ascending `depth`-subset of `0..n_vars`.
///
/// "Choose or skip" recursion: `selected` holds the partial combination and
/// `next` the first candidate still available.
fn for_each_combination<F: FnMut(&[usize])>(
    n_vars: usize,
    depth: usize,
    next: usize,
    selected: &mut Vec<usize>,
    visit: &mut F,
) {
    let remaining = depth - selected.len();
    if remaining == 0 {
        visit(selected.as_slice());
        return;
    }
    if n_vars - next < remaining {
        return;
    }

    selected.push(next);
    for_each_combination(n_vars, depth, next + 1, selected, visit);
    selected.pop();

    for_each_combination(n_vars, depth, next + 1, selected, visit);
}

/// Total number of choices for the given cut counts (counting pass).
///
/// Sums, over every ascending combination of `depth` variables, the product
/// of their cut counts.
pub fn count_choices(n_cuts: &[usize], depth: Depth) -> usize {
    let mut total = 0;
    let mut selected = Vec::with_capacity(depth.get());
    for_each_combination(n_cuts.len(), depth.get(), 0, &mut selected, &mut |vars| {
        total += vars.iter().map(|&v| n_cuts[v]).product::<usize>();
    });
    total
}

/// Append every cut tuple of one variable combination, row-major.
fn push_cut_tuples(vars: &[usize], n_cuts: &[usize], out: &mut Vec<Choice>) {
    if vars.iter().any(|&v| n_cuts[v] == 0) {
        return;
    }

    let mut cuts = [0usize; Depth::MAX];
    let cuts = &mut cuts[..vars.len()];
    loop {
        out.push(Choice::new(vars, cuts));

        // Odometer step, last dimension fastest
        let mut d = vars.len();
        loop {
            if d == 0 {
                return;
            }
            d -= 1;
            cuts[d] += 1;
            if cuts[d] < n_cuts[vars[d]] {
                break;
            }
            cuts[d] = 0;
        }
    }
}

/// Every choice for a depth, indexed by dense id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    depth: Depth,
    choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Enumerate all choices (materializing pass).
    ///
    /// # Example
    ///
    /// ```
    /// use itrsearch::{ChoiceSet, Depth};
    ///
    /// let set = ChoiceSet::enumerate(&[2, 3, 4], Depth::new(1).unwrap());
    /// assert_eq!(set.len(), 9);
    /// assert_eq!(set.table_len(), 18);
    /// ```
    pub fn enumerate(n_cuts: &[usize], depth: Depth) -> Self {
        let total = count_choices(n_cuts, depth);
        let mut choices = Vec::with_capacity(total);
        let mut selected = Vec::with_capacity(depth.get());
        for_each_combination(n_cuts.len(), depth.get(), 0, &mut selected, &mut |vars| {
            push_cut_tuples(vars, n_cuts, &mut choices);
        });
        assert_eq!(
            choices.len(),
            total,
            "materialized choice count disagrees with counting pass"
        );
        Self { depth, choices }
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Length of the score table: `len() * 2^depth`.
    #[inline]
    pub fn table_len(&self) -> usize {
        self.choices.len() << self.depth.get()
    }

    /// Choice with a given id.
    ///
    /// # Panics
    ///
    /// Panics if `id >= len()`; ids come from the enumerator, so an
    /// out-of-range id is a broken invariant.
    #[inline]
    pub fn get(&self, id: usize) -> &Choice {
        match self.choices.get(id) {
            Some(choice) => choice,
            None => panic!("choice id {id} out of range ({} choices)", self.choices.len()),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Choice] {
        &self.choices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.choices.iter()
    }

    /// Split a score-table index into `(choice id, direction mask)`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= table_len()`.
    #[inline]
    pub fn decode(&self, index: usize) -> (usize, usize) {
        assert!(
            index < self.table_len(),
            "score index {index} out of range ({} scores)",
            self.table_len()
        );
        (index >> self.depth.get(), index & (self.depth.n_masks() - 1))
    }
}

impl<'a> IntoIterator for &'a ChoiceSet {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}
