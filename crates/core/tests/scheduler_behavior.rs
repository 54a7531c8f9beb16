//! Chunk activity scheduling
//!
//! Checks the scheduler on its own and through full simulation ticks: quiet
//! regions go dormant, edits and fires wake them again.

use ecosim_core::{
    Cell, ChunkScheduler, Environment, Organ, Simulation, SimulationConfig, SubState,
};

fn scheduler() -> ChunkScheduler {
    // 4x4 chunks of 8 cells, threshold 3
    ChunkScheduler::new(32, 32, 8, 3)
}

fn run_pass(scheduler: &mut ChunkScheduler) -> usize {
    scheduler.process_active_chunks(|_, _, _| {})
}

#[test]
fn test_out_of_range_marks_are_ignored() {
    let mut s = scheduler();
    s.clear();
    s.mark_change(-1, 4);
    s.mark_change(4, -1);
    s.mark_change(32, 4);
    s.mark_change(4, 32);
    assert_eq!(s.active_chunk_count(), 0);
}

#[test]
fn test_interior_mark_wakes_chunk_and_neighbours() {
    let mut s = scheduler();
    s.clear();
    // Chunk 5 is (1, 1)
    s.mark_change(12, 12);
    assert_eq!(s.activity(5), 3);
    for &n in s.chunk_neighbors(5).iter().filter(|&&n| n != 5) {
        assert_eq!(s.activity(n), 1, "neighbour {n} should get one look");
    }
    // The neighbourhood includes the chunk itself
    assert_eq!(s.active_chunk_count(), s.chunk_neighbors(5).len());
    assert_eq!(s.active_chunk_count(), 9);
}

#[test]
fn test_edge_mark_fully_activates_adjacent_chunk() {
    let mut s = scheduler();
    s.clear();
    // Right edge of chunk 0
    s.mark_change(7, 3);
    assert_eq!(s.activity(0), 3);
    assert_eq!(s.activity(1), 3);
    // Top-left corner of chunk 5 touches chunks 4 and 1
    s.clear();
    s.mark_change(8, 8);
    assert_eq!(s.activity(5), 3);
    assert_eq!(s.activity(4), 3);
    assert_eq!(s.activity(1), 3);
}

#[test]
fn test_activity_decays_to_dormancy() {
    let mut s = scheduler();
    s.clear();
    s.mark_change(12, 12);

    let mut passes = 0;
    while s.active_chunk_count() > 0 {
        run_pass(&mut s);
        passes += 1;
        assert!(passes <= 3, "chunks never went dormant");
    }
    assert_eq!(passes, 3);
    assert_eq!(run_pass(&mut s), 0);
}

#[test]
fn test_border_chunks_are_seeded() {
    let mut s = scheduler();
    s.clear();
    s.activate_chunk(0);
    run_pass(&mut s);
    // Neighbours were visited once and are now dormant; chunk 0 remains
    assert_eq!(s.active_chunks(), &[0]);

    s.add_border_chunks();
    for &n in s.chunk_neighbors(0).iter().filter(|&&n| n != 0) {
        assert!(s.is_active(n));
        assert_eq!(s.activity(n), 1);
    }
}

#[test]
fn test_changes_during_a_pass_schedule_the_next_one() {
    let mut s = scheduler();
    s.clear();
    s.activate_chunk(0);
    let mut marked = false;
    s.process_active_chunks(|s, x, y| {
        if !marked && x == 0 && y == 0 {
            // Chunk 15 is far from chunk 0
            s.mark_change(28, 28);
            marked = true;
        }
    });
    assert!(s.is_active(15));
}

#[test]
fn test_quiet_simulation_stops_processing() {
    let config = SimulationConfig::new(48, 32).with_chunking(8, 3);
    let mut sim = Simulation::new(config).unwrap();
    sim.fill_rect(0, 24, 48, 32, Cell::soil(0, 0));

    sim.run(10, &Environment::TEMPERATE);
    assert_eq!(sim.active_chunk_count(), 0);
    sim.tick(&Environment::TEMPERATE);
    let stats = sim.get_stats();
    assert_eq!(stats.chunks_processed, 0);
    assert_eq!(stats.changed_cells, 0);
}

#[test]
fn test_edit_wakes_dormant_world() {
    let config = SimulationConfig::new(48, 32).with_chunking(8, 3);
    let mut sim = Simulation::new(config).unwrap();
    sim.fill_rect(0, 24, 48, 32, Cell::soil(0, 0));
    sim.run(10, &Environment::TEMPERATE);
    assert_eq!(sim.active_chunk_count(), 0);

    sim.set_cell(20, 10, Cell::water(100)).unwrap();
    assert!(sim.active_chunk_count() > 0);
    sim.tick(&Environment::TEMPERATE);
    assert!(sim.get_stats().chunks_processed > 0);
    // The drop fell one row
    assert_eq!(sim.get_cell(20, 11).map(|c| c.water), Some(100));
}

#[test]
fn test_fires_burn_in_dormant_chunks() {
    let config = SimulationConfig::new(48, 32).with_chunking(8, 3);
    let mut sim = Simulation::new(config).unwrap();
    sim.fill_rect(0, 24, 48, 32, Cell::soil(0, 0));
    // A bare plant cell has no organ rule, so nothing keeps its chunk awake
    let stump = Cell {
        sub_state: SubState::None,
        ..Cell::plant(Organ::Stem)
    };
    sim.set_cell(30, 23, stump).unwrap();
    sim.run(10, &Environment::TEMPERATE);
    assert_eq!(sim.active_chunk_count(), 0);

    let idx = sim.index(30, 23).unwrap();
    assert!(sim.start_fire(30, 23).unwrap());
    let before = sim.fire().burn_progress(sim.grid(), idx);
    sim.tick(&Environment::TEMPERATE);
    assert!(sim.fire().burn_progress(sim.grid(), idx) > before);
}
