//! Tree functions, their multiplicative extension, and the convolution
//! product `(f · g)(t) = μ ∘ (f ⊗ g) ∘ Δ(t)`

use super::memo::MemoTable;
use super::{Algebra, AntipodeCache, Forest, FormalSum, Ring, Scalar, Tree};
use crate::config::EngineConfig;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

static NEXT_CHARACTER_ID: AtomicU64 = AtomicU64::new(0);

/// The counit: 1 on ∅, 0 on every other tree
pub fn counit<R: Ring>(t: &Tree) -> R {
    if t.is_void() {
        R::one()
    } else {
        R::zero()
    }
}

/// A function on trees with a stable identity.
///
/// Clones share the identity of the original, which is what memoized
/// convolution powers are keyed by. Two characters built from the same
/// closure separately are distinct.
pub struct Character<R> {
    id: u64,
    func: Arc<dyn Fn(&Tree) -> R + Send + Sync>,
}

impl<R> Character<R> {
    /// Wrap a tree function
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Tree) -> R + Send + Sync + 'static,
    {
        Character {
            id: NEXT_CHARACTER_ID.fetch_add(1, Ordering::Relaxed),
            func: Arc::new(func),
        }
    }

    /// Identity used in memo keys
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Evaluate on a single tree
    pub fn call(&self, t: &Tree) -> R {
        (self.func)(t)
    }
}

impl<R: Ring + 'static> Character<R> {
    /// The counit ε
    pub fn counit() -> Self {
        Character::new(counit::<R>)
    }
}

impl<S: Scalar> Character<FormalSum<S>> {
    /// The identity map `t ↦ t`
    pub fn identity() -> Self {
        Character::new(|t: &Tree| FormalSum::from(t.clone()))
    }

    /// The antipode `t ↦ S(t)`, memoized in `cache`
    pub fn antipode(cache: Arc<AntipodeCache<S>>) -> Self {
        Character::new(move |t: &Tree| cache.tree(t))
    }
}

impl<R> Clone for Character<R> {
    fn clone(&self) -> Self {
        Character {
            id: self.id,
            func: self.func.clone(),
        }
    }
}

impl<R> fmt::Debug for Character<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Character(#{})", self.id)
    }
}

impl Tree {
    /// Apply a function defined on trees
    pub fn apply<R, F>(&self, func: F) -> R
    where
        F: Fn(&Tree) -> R,
    {
        func(self)
    }

    /// The convolution product of two tree functions evaluated on this tree,
    /// `Σ f(P_c(t)) g(R_c(t))` over the full coproduct.
    pub fn apply_product<R, F, G>(&self, f: F, g: G) -> R
    where
        R: Ring,
        F: Fn(&Tree) -> R,
        G: Fn(&Tree) -> R,
    {
        self.split()
            .pairs()
            .fold(R::zero(), |acc, (kept, removed)| acc + removed.apply(&f) * g(kept))
    }

    /// `f^n(t)`, see [`Convolution::apply_power`]
    pub fn apply_power<S, R>(&self, engine: &Convolution<S, R>, func: &Character<R>, n: i64) -> R
    where
        S: Scalar,
        R: Algebra<S>,
    {
        engine.apply_power(func, n, self)
    }
}

impl Forest {
    /// Apply a function defined on trees multiplicatively: `Π f(tᵢ)`
    pub fn apply<R, F>(&self, func: F) -> R
    where
        R: Ring,
        F: Fn(&Tree) -> R,
    {
        self.iter().fold(R::one(), |acc, t| acc * func(t))
    }

    /// `Π (f · g)(tᵢ)`
    pub fn apply_product<R, F, G>(&self, f: F, g: G) -> R
    where
        R: Ring,
        F: Fn(&Tree) -> R,
        G: Fn(&Tree) -> R,
    {
        self.apply(|t| t.apply_product(&f, &g))
    }

    /// `Π f^n(tᵢ)`
    pub fn apply_power<S, R>(&self, engine: &Convolution<S, R>, func: &Character<R>, n: i64) -> R
    where
        S: Scalar,
        R: Algebra<S>,
    {
        engine.apply_power_forest(func, n, self)
    }
}

impl<S: Scalar> FormalSum<S> {
    /// Apply a function defined on trees as a multiplicative linear map:
    /// `Σ cᵢ Π f(tᵢⱼ)`
    pub fn apply<R, F>(&self, func: F) -> R
    where
        R: Algebra<S>,
        F: Fn(&Tree) -> R,
    {
        self.terms().fold(R::zero(), |acc, (forest, c)| {
            acc + <R as Algebra<S>>::from_scalar(c.clone()) * forest.apply(&func)
        })
    }

    /// `Σ cᵢ Π (f · g)(tᵢⱼ)`
    pub fn apply_product<R, F, G>(&self, f: F, g: G) -> R
    where
        R: Algebra<S>,
        F: Fn(&Tree) -> R,
        G: Fn(&Tree) -> R,
    {
        self.apply(|t| t.apply_product(&f, &g))
    }

    /// `Σ cᵢ Π f^n(tᵢⱼ)`
    pub fn apply_power<R>(&self, engine: &Convolution<S, R>, func: &Character<R>, n: i64) -> R
    where
        R: Algebra<S>,
    {
        engine.apply_power_sum(func, n, self)
    }
}

/// Memo table sizes of a [`Convolution`] engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Memoized antipodes
    pub antipodes: usize,
    /// Memoized convolution powers
    pub powers: usize,
    /// Memoized convolution products
    pub products: usize,
}

/// Evaluates convolution products and powers of characters, memoizing by
/// (character identity, exponent, canonical tree).
///
/// `S` is the coefficient ring of antipodes, `R` the value ring of the
/// characters. Negative powers go through the antipode: `f^{-n} = f^n ∘ S`.
pub struct Convolution<S, R> {
    config: EngineConfig,
    antipodes: Arc<AntipodeCache<S>>,
    powers: MemoTable<(u64, i128, Tree), R>,
    products: MemoTable<(u64, u64, Tree), R>,
}

impl<S, R> Convolution<S, R>
where
    S: Scalar,
    R: Algebra<S>,
{
    /// Create an engine with unbounded caches
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine from a configuration
    pub fn with_config(config: EngineConfig) -> Self {
        let antipodes = Arc::new(AntipodeCache::with_config(&config));
        Self::with_antipodes(config, antipodes)
    }

    /// Create an engine that shares an existing antipode cache
    pub fn with_antipodes(config: EngineConfig, antipodes: Arc<AntipodeCache<S>>) -> Self {
        Convolution {
            powers: MemoTable::with_capacity("convolution powers", config.cache_capacity),
            products: MemoTable::with_capacity("convolution products", config.cache_capacity),
            antipodes,
            config,
        }
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The antipode cache used for negative powers
    pub fn antipodes(&self) -> &Arc<AntipodeCache<S>> {
        &self.antipodes
    }

    /// The counit ε(t)
    pub fn counit(&self, t: &Tree) -> R {
        counit(t)
    }

    /// `Σ left(P_c(t)) · right(R_c(t))` over the full coproduct of `t`
    fn convolve<A, B>(&self, t: &Tree, left: A, right: B) -> R
    where
        A: Fn(&Forest) -> R,
        B: Fn(&Tree) -> R,
    {
        self.split_pairs(t)
            .into_iter()
            .fold(R::zero(), |acc, (kept, removed)| acc + left(&removed) * right(&kept))
    }

    fn split_pairs(&self, t: &Tree) -> Vec<(Tree, Forest)> {
        let (kept, removed) = t
            .split_with_threshold(self.config.parallel_split_threshold)
            .into_parts();
        kept.into_iter().zip(removed).collect()
    }

    /// `(f · g)(t)`, memoized per (f, g, t)
    pub fn apply_product(&self, f: &Character<R>, g: &Character<R>, t: &Tree) -> R {
        self.products.get_or_compute((f.id(), g.id(), t.clone()), || {
            self.convolve(t, |forest| forest.apply(|x| f.call(x)), |x| g.call(x))
        })
    }

    /// The `n`-th convolution power of `f` evaluated on `t`:
    ///
    /// - `n = 0`: the counit
    /// - `n = 1`: `f(t)`
    /// - `n > 1`: `(f · f^{n-1})(t)`
    /// - `n < 0`: `f^{|n|}` applied to `S(t)`
    ///
    /// Convolution is associative, so `f^n` is evaluated as
    /// `f^{n-h} · f^h` with `h = n / 2`; the recursion depth is logarithmic
    /// in `|n|` and every `i64`, including `i64::MIN`, is accepted.
    pub fn apply_power(&self, f: &Character<R>, n: i64, t: &Tree) -> R {
        if n >= 0 {
            return self.positive_power(f, n.unsigned_abs(), t);
        }
        self.powers.get_or_compute((f.id(), i128::from(n), t.clone()), || {
            let magnitude = n.unsigned_abs();
            self.antipodes
                .tree(t)
                .apply(|x| self.positive_power(f, magnitude, x))
        })
    }

    fn positive_power(&self, f: &Character<R>, n: u64, t: &Tree) -> R {
        match n {
            0 => counit(t),
            1 => f.call(t),
            _ => self.powers.get_or_compute((f.id(), i128::from(n), t.clone()), || {
                let half = n / 2;
                self.convolve(
                    t,
                    |forest| forest.apply(|x| self.positive_power(f, n - half, x)),
                    |x| self.positive_power(f, half, x),
                )
            }),
        }
    }

    /// `f^n` extended multiplicatively to a forest
    pub fn apply_power_forest(&self, f: &Character<R>, n: i64, forest: &Forest) -> R {
        forest.apply(|t| self.apply_power(f, n, t))
    }

    /// `f^n` extended linearly to a formal sum
    pub fn apply_power_sum(&self, f: &Character<R>, n: i64, sum: &FormalSum<S>) -> R {
        sum.apply(|t| self.apply_power(f, n, t))
    }

    /// Sizes of the memo tables
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            antipodes: self.antipodes.len(),
            powers: self.powers.len(),
            products: self.products.len(),
        }
    }

    /// Drop every memoized value, including antipodes
    pub fn clear(&self) {
        debug!(stats = ?self.stats(), "clearing convolution caches");
        self.antipodes.clear();
        self.powers.clear();
        self.products.clear();
    }
}

impl<S, R> Default for Convolution<S, R>
where
    S: Scalar,
    R: Algebra<S>,
{
    fn default() -> Self {
        Self::new()
    }
}
