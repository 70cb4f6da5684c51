use bld::{
    Operation, default_moveset, solve,
    api::{StateData, apply_scramble_to_state, solve_bld_with_default_moveset},
    translate_solution,
};
use cube_core::{CubeState, Move, apply_all, format_moves, parse, scramble_to_state};
use log::info;

fn random_moves(rng: &mut fastrand::Rng, len: usize) -> Vec<Move> {
    (0..len).map(|_| Move::ALL[rng.usize(..Move::ALL.len())]).collect()
}

/// Solves `state` with the default moveset and performs the result on it.
fn execute_solution(state: CubeState) -> CubeState {
    let solution = solve(&state).unwrap();
    let translated = translate_solution(&solution, default_moveset()).unwrap();
    apply_all(state, parse(&translated.formatted_solution).unwrap())
}

#[test_log::test]
fn known_scrambles_are_solved() {
    for scramble in [
        "R",
        "U",
        "R U R' U'",
        "R U R' U' R' F R2 U' R' U' R U R' F'",
        "F2 U' L B2 R' D F' U2 B L2 D' R",
        "D2 B2 L' F2 R U2 R2 B2 U2 L' F' L2 D' F R B' D R2 F'",
        "U R2 F B R B2 R U2 L B2 R U' D' R2 F R' L B2 U2 F2",
    ] {
        let state = scramble_to_state(scramble).unwrap();
        let solution = solve(&state).unwrap();
        let translated = translate_solution(&solution, default_moveset()).unwrap();
        info!(
            "{scramble}: {} corner and {} edge operations",
            solution.corner_operations.len(),
            solution.edge_operations.len()
        );
        let end = apply_all(state, parse(&translated.formatted_solution).unwrap());
        assert!(end.is_solved(), "{scramble}");
    }
}

#[test_log::test]
fn random_scrambles_are_solved() {
    let mut rng = fastrand::Rng::with_seed(0xB1D);
    for _ in 0..200 {
        let len = rng.usize(0..40);
        let moves = random_moves(&mut rng, len);
        let state = apply_all(CubeState::solved(), moves.iter().copied());
        assert!(execute_solution(state).is_solved(), "{}", format_moves(&moves));
    }
}

#[test_log::test]
fn sequences_solve_one_operation_at_a_time() {
    let state = scramble_to_state("B' R2 D L' F U2 R' B2 L D2").unwrap();
    let solution = solve(&state).unwrap();
    let translated = translate_solution(&solution, default_moveset()).unwrap();
    assert_eq!(translated.move_sequences.len(), translated.all_operations.len());

    // Each sequence performs exactly its own operation on the solved cube
    for (operation, sequence) in translated.all_operations.iter().zip(&translated.move_sequences) {
        let effect = apply_all(CubeState::solved(), parse(&sequence.sequence).unwrap());
        assert_eq!(Some(effect), operation.expected_effect(), "{operation}");
        assert_eq!(sequence.description, operation.to_string());
    }
}

#[test_log::test]
fn every_reachable_operation_has_an_algorithm() {
    let moveset = default_moveset();
    for operation in Operation::all_reachable() {
        assert!(moveset.get(&operation).is_some(), "{operation}");
    }
}

#[test_log::test]
fn random_solutions_only_use_known_operations() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..300 {
        let state = apply_all(CubeState::solved(), random_moves(&mut rng, 30));
        seen.extend(solve(&state).unwrap().all_operations());
    }
    for operation in &seen {
        assert!(default_moveset().get(operation).is_some(), "{operation}");
    }
    // Long scrambles reach most shapes
    assert!(seen.len() > Operation::all_reachable().len() / 2);
}

#[test_log::test]
fn api_round_trip() {
    let scramble = "L2 F' U R2 B D' L F2 U' R";
    let result = apply_scramble_to_state(scramble);
    assert!(result.success);
    let StateData { cp, co, ep, eo } = result.state.unwrap();

    let result = solve_bld_with_default_moveset(&cp, &co, &ep, &eo);
    assert!(result.success, "{:?}", result.error);
    let solution = result.solution.unwrap();
    assert_eq!(
        solution.all_operations.len(),
        solution.corner_operations.len() + solution.edge_operations.len()
    );
    assert!(
        solution.all_operations[..solution.corner_operations.len()]
            .iter()
            .all(|operation| matches!(operation, Operation::Corner(_)))
    );

    let state = scramble_to_state(scramble).unwrap();
    let end = apply_all(state, parse(&solution.formatted_solution).unwrap());
    assert!(end.is_solved());
}

#[test_log::test]
fn solving_is_deterministic() {
    let state = StateData::from(&scramble_to_state("R2 D' B L2 U F' R D2 L' B2").unwrap());
    let first = solve_bld_with_default_moveset(&state.cp, &state.co, &state.ep, &state.eo);
    let second = solve_bld_with_default_moveset(&state.cp, &state.co, &state.ep, &state.eo);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
