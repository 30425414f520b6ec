use num_bigint::BigUint;
use robdd_sat::ast::Expr;
use robdd_sat::bdd::Bdd;
use robdd_sat::cdcl::{cdcl, SolveResult, Solver};
use robdd_sat::model::Model;
use robdd_sat::tseitin::{nnf, prune_unary, transform_tseitin};
use robdd_sat::types::Var;

use test_log::test;

fn cell(i: usize, j: usize) -> Expr {
    Expr::var(format!("p_{}_{}", i, j))
}

/// N queens on an NxN board, built as one left-deep conjunction:
/// - at least one queen per row and per column,
/// - at most one queen per row and per column,
/// - no two queens on a diagonal.
fn queens(n: usize) -> Expr {
    let mut expr = Expr::constant(true);

    for i in 0..n {
        let mut row = Expr::constant(false);
        for j in 0..n {
            row = Expr::or(row, cell(i, j));
        }
        expr = Expr::and(expr, row);
    }

    for j in 0..n {
        let mut col = Expr::constant(false);
        for i in 0..n {
            col = Expr::or(col, cell(i, j));
        }
        expr = Expr::and(expr, col);
    }

    for i in 0..n {
        for j1 in 1..n {
            for j2 in 0..j1 {
                expr = Expr::and(expr, !cell(i, j1) | !cell(i, j2));
            }
        }
    }

    for j in 0..n {
        for i1 in 1..n {
            for i2 in 0..i1 {
                expr = Expr::and(expr, !cell(i1, j) | !cell(i2, j));
            }
        }
    }

    for a in 1..n * n {
        let (i1, j1) = (a / n, a % n);
        for b in 0..a {
            let (i2, j2) = (b / n, b % n);
            if i1 + j2 == i2 + j1 || i1 + j1 == i2 + j2 {
                expr = Expr::and(expr, !cell(i1, j1) | !cell(i2, j2));
            }
        }
    }

    expr
}

/// Positions of the queens placed by `model`.
fn placement(model: &Model) -> Vec<(usize, usize)> {
    model
        .variables(true)
        .iter()
        .filter_map(Var::name)
        .map(|name| {
            let mut parts = name.trim_start_matches("p_").split('_');
            let i = parts.next().and_then(|s| s.parse().ok()).expect("row index");
            let j = parts.next().and_then(|s| s.parse().ok()).expect("column index");
            (i, j)
        })
        .collect()
}

fn assert_valid_placement(n: usize, queens: &[(usize, usize)]) {
    assert_eq!(queens.len(), n, "expected {} queens, got {:?}", n, queens);
    for (k, &(i1, j1)) in queens.iter().enumerate() {
        for &(i2, j2) in &queens[..k] {
            assert_ne!(i1, i2, "same row: {:?}", queens);
            assert_ne!(j1, j2, "same column: {:?}", queens);
            assert_ne!(i1 + j2, i2 + j1, "same diagonal: {:?}", queens);
            assert_ne!(i1 + j1, i2 + j2, "same anti-diagonal: {:?}", queens);
        }
    }
}

#[test]
fn test_queens_bdd() -> color_eyre::Result<()> {
    let n = 4;
    let expr = prune_unary(&queens(n));
    println!("size(expr) = {}", expr.size());

    let bdd = Bdd::default();
    let f = bdd.from_expr(&expr)?;
    println!("size(bdd) = {}, bdd = {:?}", bdd.size(f), bdd);
    assert!(bdd.is_sat(f));

    // 4 queens have exactly two solutions.
    assert_eq!(bdd.sat_count(f, n * n), BigUint::from(2u32));

    let model = bdd.find_model(f).expect("satisfiable");
    println!("model = {}", model);
    assert_valid_placement(n, &placement(&model));
    Ok(())
}

#[test]
fn test_queens_cdcl() {
    let n = 4;
    let cnf = transform_tseitin(&nnf(&queens(n)));
    println!("cnf: {} clauses over {} variables", cnf.len(), cnf.variables().len());

    let bdd = Bdd::default();
    let (sat, solution) = cdcl(cnf, &bdd);
    assert!(sat);

    let model = bdd.find_model(solution).expect("single-path model");
    assert_valid_placement(n, &placement(&model.without_generated()));
}

#[test]
fn test_queens_engines_agree() -> color_eyre::Result<()> {
    for (n, expected) in [(1, true), (2, false), (3, false)] {
        let expr = queens(n);

        let bdd = Bdd::default();
        let f = bdd.from_expr(&expr)?;
        assert_eq!(bdd.is_sat(f), expected, "bdd, n = {}", n);

        let mut solver = Solver::new(transform_tseitin(&nnf(&expr)));
        let result = solver.solve();
        println!("n = {}: {:?} after {} steps", n, result, solver.steps());
        let expected = if expected { SolveResult::Sat } else { SolveResult::Unsat };
        assert_eq!(result, expected, "cdcl, n = {}", n);
    }
    Ok(())
}
