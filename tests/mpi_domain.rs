#![cfg(feature = "mpi")]
use basin_dof::activity::ElementThicknessActivityPredicate;
use basin_dof::column::{StratigraphicColumn, ThicknessHistoryLayer};
use basin_dof::comm::MpiComm;
use basin_dof::domain::ComputationalDomain;
use basin_dof::grid::LateralGrid;
use basin_dof::traits::DomainComm;
use basin_dof::types::{DomainOptions, LayerKind, NULL_DOF_NUMBER};
use mpi::environment::Universe;
use std::sync::LazyLock;

static MPI_UNIVERSE: LazyLock<Universe> = std::sync::LazyLock::new(|| {
    mpi::initialize_with_threading(mpi::Threading::Multiple)
        .unwrap()
        .0
});

#[test]
fn test_mpi_numbering() {
    let world = MPI_UNIVERSE.world();
    let comm = MpiComm::new(&world);
    let layers = vec![
        ThicknessHistoryLayer::new("top", LayerKind::Sediment, 10.0, 0.0, 8, 5, 2, 10.0),
        ThicknessHistoryLayer::new("base", LayerKind::Sediment, 30.0, 10.0, 8, 5, 3, 10.0),
    ];
    let grid = LateralGrid::new(8, 5, comm.size(), 1, comm.rank()).unwrap();
    let mut domain = ComputationalDomain::new(
        StratigraphicColumn::new(&layers, 0, 1),
        &grid,
        &comm,
        ElementThicknessActivityPredicate::default(),
        DomainOptions::default(),
    )
    .unwrap();
    domain.reset_age(0.0, false);

    assert_eq!(domain.global_number_of_active_nodes(), 8 * 5 * 6);
    assert_eq!(domain.start_dofs()[comm.rank()], domain.local_start_dof());
    for element in domain.active_elements() {
        assert!(element.dofs().iter().all(|d| *d != NULL_DOF_NUMBER));
    }
}
