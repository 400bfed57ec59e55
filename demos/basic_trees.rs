//! Basic example of Hopf algebra operations on rooted trees

use hopf_trees::prelude::*;
use num_rational::Rational64;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== Hopf Algebra of Rooted Trees ===\n");

    // Create some trees
    let t1 = Tree::leaf();
    let t2 = TreeBuilder::new().add_child(0, 1).build()?;
    let t3: Tree = "[[],[]]".parse()?;

    println!("Tree 1 (single node): {}", t1);
    println!("Tree 2 (two nodes):   {}", t2);
    println!("Tree 3 (cherry):      {}", t3);

    for t in [&t1, &t2, &t3] {
        println!(
            "  {}: nodes = {}, t! = {}, σ = {}, labellings = {}",
            t,
            t.nodes(),
            t.factorial()?,
            t.symmetry()?,
            t.distinct_increasing_labellings()?
        );
    }

    // Demonstrate coproduct
    println!("\n--- Coproduct ---");
    let split = t3.split();
    println!("Δ(t3) has {} terms:", split.len());
    for (kept, removed) in split.pairs() {
        println!("  {} ⊗ {}", removed, kept);
    }

    // Demonstrate antipode
    println!("\n--- Antipode ---");
    let cache = AntipodeCache::<i64>::new();
    let start = Instant::now();
    let s_t2 = t2.antipode_with_cache(&cache)?;
    let s_t3 = t3.antipode_with_cache(&cache)?;
    println!("S(t2) = {}", s_t2);
    println!("S(t3) = {}", s_t3);

    let s_s_t3 = s_t3.antipode_with_cache(&cache)?;
    println!("S(S(t3)) = {}  (equal to t3: {})", s_s_t3, s_s_t3 == t3);
    println!("took {:?}", start.elapsed());

    // Natural growth
    println!("\n--- Trees by order ---");
    for k in 1..=6 {
        println!("order {}: {} trees", k, trees_of_order(k).len());
    }

    // B-series: powers of the exact flow
    println!("\n--- Convolution powers of the exact flow ---");
    let engine: Convolution<Rational64, Rational64> = Convolution::new();
    let flow = Character::new(|t: &Tree| match t.factorial() {
        Ok(f) => Rational64::new(1, f as i64),
        Err(_) => Rational64::from_integer(0),
    });
    for t in trees_of_order(4) {
        println!(
            "  {}: a = {}, a^2 = {}, a^-1 = {}",
            t,
            engine.apply_power(&flow, 1, &t),
            engine.apply_power(&flow, 2, &t),
            engine.apply_power(&flow, -1, &t)
        );
    }
    println!("cache: {:?}", engine.stats());

    Ok(())
}
