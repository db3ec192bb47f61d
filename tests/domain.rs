use approx::assert_relative_eq;
use basin_dof::activity::{ElementThicknessActivityPredicate, SedimentElementActivityPredicate};
use basin_dof::column::{StratigraphicColumn, ThicknessHistoryLayer};
use basin_dof::comm::SerialComm;
use basin_dof::domain::{ComputationalDomain, SolutionVectorMapping};
use basin_dof::grid::{GeneralElement, LateralGrid};
use basin_dof::traits::Formation;
use basin_dof::types::{
    DofOrdering, DomainError, DomainOptions, Face, LayerKind, NULL_DOF_NUMBER,
};

fn sediment(name: &str, start: f64, end: f64, segments: usize, thickness: f64) -> ThicknessHistoryLayer {
    ThicknessHistoryLayer::new(name, LayerKind::Sediment, start, end, 4, 4, segments, thickness)
}

fn domain<'a>(
    layers: &'a [ThicknessHistoryLayer],
    grid: &'a LateralGrid,
    options: DomainOptions,
) -> ComputationalDomain<'a, ThicknessHistoryLayer, SerialComm> {
    ComputationalDomain::new(
        StratigraphicColumn::new(layers, 0, layers.len() - 1),
        grid,
        &SerialComm,
        ElementThicknessActivityPredicate::default(),
        options,
    )
    .unwrap()
}

#[test]
fn test_single_layer_column() {
    let layers = vec![
        sediment("sand", 100.0, 0.0, 4, 10.0),
        ThicknessHistoryLayer::new("mantle", LayerKind::Mantle, 300.0, 200.0, 4, 4, 3, 30.0)
            .with_top_depth(40.0),
    ];
    let grid = LateralGrid::serial(2, 2).unwrap();
    // The mantle lies below the bottom of the modelled column.
    let column = StratigraphicColumn::new(&layers, 0, 0);
    assert_eq!(column.number_of_layers(), 1);
    let mut domain = ComputationalDomain::new(
        column,
        &grid,
        &SerialComm,
        ElementThicknessActivityPredicate::default(),
        DomainOptions::default(),
    )
    .unwrap();
    domain.reset_age(0.0, true);

    assert!(domain.is_active());
    assert_eq!(domain.number_of_nodes_in_depth(), 5);
    for (i, j) in grid.local_box().columns() {
        assert_eq!(domain.depth_indices().column(i, j), &[0, 1, 2, 3, 4]);
    }
    assert_eq!(domain.local_number_of_active_elements(), 4);
    assert_eq!(domain.local_start_dof(), 0);
    assert_eq!(domain.global_number_of_active_nodes(), 20);
    assert_eq!(domain.active_node_counts(), &[20]);
    assert_eq!(domain.maximum_degenerate_segments(), 0);

    let mapping = domain.local_to_global_mapping().unwrap();
    assert_eq!(mapping.indices(), 0..20);

    for element in domain.active_elements() {
        assert!(element.dofs().iter().all(|d| (0..20).contains(d)));
        for n in 0..4 {
            assert_eq!(element.node_k(n), element.k());
            assert_eq!(element.node_k(n + 4), element.k() + 1);
        }
    }
}

#[test]
fn test_inactive_before_deposition() {
    let layers = vec![sediment("sand", 100.0, 50.0, 2, 10.0)];
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());

    domain.reset_age(150.0, false);
    assert!(!domain.is_active());
    assert_eq!(domain.current_age(), Some(150.0));
    assert_eq!(domain.global_number_of_active_nodes(), 0);
    assert_eq!(domain.local_number_of_active_elements(), 0);
    assert!(domain.dof_numbers().is_none());
    assert!(domain.local_to_global_mapping().is_none());
    assert!(domain.local_nodes().is_empty());

    domain.reset_age(75.0, false);
    assert!(domain.is_active());
    assert_eq!(domain.number_of_nodes_in_depth(), 3);
    // Only the deepest segment has been deposited.
    assert_eq!(domain.local_number_of_active_elements(), 1);
    assert_eq!(domain.global_number_of_active_nodes(), 8);

    domain.reset_age(150.0, false);
    assert!(!domain.is_active());
    for element in domain.layer_grid(0).iter() {
        assert!(element.dofs().iter().all(|d| *d == NULL_DOF_NUMBER));
    }
}

#[test]
fn test_empty_column() {
    let layers: Vec<ThicknessHistoryLayer> = vec![];
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = ComputationalDomain::new(
        StratigraphicColumn::from_layers(layers.iter().collect()),
        &grid,
        &SerialComm,
        ElementThicknessActivityPredicate::default(),
        DomainOptions::default(),
    )
    .unwrap();
    domain.reset_age(0.0, false);
    assert!(!domain.is_active());
    assert_eq!(domain.maximum_number_of_elements(), 0);
}

#[test]
fn test_reset_age_is_idempotent() {
    let layers = vec![
        sediment("top", 20.0, 0.0, 2, 5.0),
        sediment("base", 50.0, 20.0, 3, 5.0),
    ];
    let grid = LateralGrid::serial(3, 3).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());

    domain.reset_age(10.0, false);
    let dofs = domain.dof_numbers().unwrap().owned_values();
    let elements = domain.active_elements().cloned().collect::<Vec<_>>();

    domain.reset_age(10.0, false);
    assert_eq!(domain.dof_numbers().unwrap().owned_values(), dofs);
    assert_eq!(domain.active_elements().cloned().collect::<Vec<_>>(), elements);
}

#[test]
fn test_degenerate_segment() {
    let mut layers = vec![sediment("sand", 30.0, 0.0, 3, 10.0)];
    for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        layers[0].set_thickness(i, j, 1, 0.0);
    }
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());
    domain.reset_age(0.0, false);

    assert_eq!(domain.number_of_nodes_in_depth(), 4);
    assert_eq!(domain.depth_indices().column(0, 0), &[0, 2, 2, 3]);
    assert_eq!(domain.maximum_degenerate_segments(), 1);
    assert_eq!(domain.local_number_of_active_elements(), 2);
    assert_eq!(domain.global_number_of_active_nodes(), 12);
    assert!(!domain.is_node_active(0, 0, 1));
    assert_eq!(domain.dof_number(0, 0, 1), None);

    // The collapsed node shares the DOF of the node above it.
    let bottom = domain.active_element(0);
    assert_eq!(bottom.k(), 0);
    assert_eq!(bottom.node_k(4), 2);
    assert_eq!(Some(bottom.dof(4) as usize), domain.dof_number(0, 0, 2));

    let mapping = SolutionVectorMapping::new(&domain);
    let solution = (0..12).map(|n| n as f64).collect::<Vec<_>>();
    let values = mapping.to_logical(&solution, -1.0);
    for (i, j) in grid.local_box().columns() {
        assert_relative_eq!(values[[i, j, 1]], values[[i, j, 2]]);
        assert!(values[[i, j, 0]] >= 0.0);
    }
    let mut round_trip = vec![0.0; 12];
    mapping.from_logical(&values, &mut round_trip);
    assert_eq!(round_trip, solution);
}

#[test]
fn test_consecutive_degenerate_segments() {
    let mut layers = vec![sediment("sand", 40.0, 0.0, 4, 10.0)];
    for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        layers[0].set_thickness(i, j, 1, 0.0);
        layers[0].set_thickness(i, j, 2, 0.0);
    }
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());
    domain.reset_age(0.0, false);

    let column = domain.depth_indices().column(1, 1).to_vec();
    assert_eq!(column, vec![0, 3, 3, 3, 4]);
    for k in 0..4 {
        let index = column[k];
        assert!(index == k as i64 || index == column[k + 1]);
    }
    assert_eq!(domain.maximum_degenerate_segments(), 2);
    assert_eq!(domain.global_number_of_active_nodes(), 12);
}

#[test]
fn test_mantle_uses_depth() {
    let mut mantle = ThicknessHistoryLayer::new("mantle", LayerKind::Mantle, 1000.0, 1000.0, 2, 2, 3, 100.0)
        .with_top_depth(5000.0);
    mantle.set_column_thickness(0, 0, 0.0);
    let layers = vec![sediment("sand", 10.0, 0.0, 1, 10.0), mantle];
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());
    domain.reset_age(0.0, false);

    assert_eq!(domain.number_of_nodes_in_depth(), 5);
    assert_eq!(domain.depth_indices().column(0, 0), &[3, 3, 3, 3, 4]);
    assert_eq!(domain.depth_indices().column(1, 1), &[0, 1, 2, 3, 4]);
    assert_eq!(domain.maximum_degenerate_segments(), 3);
    // The mantle elements are still thick at three of their corners.
    assert_eq!(domain.local_number_of_active_elements(), 4);
    assert_eq!(domain.global_number_of_active_nodes(), 3 * 5 + 2);
}

#[test]
fn test_orderings_number_the_same_nodes() {
    let layers = vec![
        sediment("top", 20.0, 0.0, 2, 5.0),
        sediment("base", 50.0, 20.0, 2, 5.0),
    ];
    let grid = LateralGrid::serial(3, 4).unwrap();
    let mut nodes = vec![];
    for ordering in DofOrdering::ALL {
        let mut domain = domain(&layers, &grid, DomainOptions::default().with_dof_ordering(ordering));
        domain.reset_age(0.0, false);
        assert_eq!(domain.dof_ordering(), ordering);

        let local_nodes = domain.local_nodes();
        for (n, [i, j, k]) in local_nodes.iter().enumerate() {
            assert_eq!(domain.dof_number(*i, *j, *k), Some(n));
        }
        let mut sorted = local_nodes.clone();
        sorted.sort();
        nodes.push(sorted);

        match ordering {
            DofOrdering::Ijk => assert_eq!(domain.dof_number(0, 0, 1), Some(1)),
            DofOrdering::Kij => assert_eq!(domain.dof_number(0, 1, 0), Some(1)),
            DofOrdering::Kji => assert_eq!(domain.dof_number(1, 0, 0), Some(1)),
        }
    }
    assert_eq!(nodes[0], nodes[1]);
    assert_eq!(nodes[1], nodes[2]);
    assert_eq!(nodes[0].len(), 3 * 4 * 5);
}

#[test]
fn test_unknown_ordering() {
    assert_eq!(
        "zyx".parse::<DofOrdering>(),
        Err(DomainError::UnknownDofOrdering("zyx".to_string()))
    );
}

#[test]
fn test_unmodelled_columns() {
    let layers = vec![ThicknessHistoryLayer::new(
        "sand",
        LayerKind::Sediment,
        10.0,
        0.0,
        3,
        3,
        1,
        10.0,
    )];
    let mut grid = LateralGrid::serial(3, 3).unwrap();
    grid.set_node_defined(2, 2, false);
    let mut domain = domain(&layers, &grid, DomainOptions::default());
    domain.reset_age(0.0, false);

    assert_eq!(domain.local_number_of_active_elements(), 3);
    assert_eq!(domain.global_number_of_active_nodes(), 8 * 2);
    assert_eq!(domain.depth_indices().column(2, 2), &[NULL_DOF_NUMBER; 2]);
    assert_eq!(domain.dof_number(2, 2, 0), None);
    for element in domain.active_elements() {
        assert!(element.is_valid());
        assert!(element.dofs().iter().all(|d| *d != NULL_DOF_NUMBER));
    }
}

#[test]
fn test_predicates() {
    let layers = vec![
        sediment("sand", 10.0, 0.0, 1, 10.0),
        ThicknessHistoryLayer::new("crust", LayerKind::Crust, 500.0, 500.0, 2, 2, 2, 1000.0),
    ];
    let grid = LateralGrid::serial(2, 2).unwrap();

    let mut all = domain(&layers, &grid, DomainOptions::default());
    all.reset_age(0.0, false);
    assert_eq!(all.local_number_of_active_elements(), 3);

    let mut sediments = ComputationalDomain::new(
        StratigraphicColumn::new(&layers, 0, 1),
        &grid,
        &SerialComm,
        SedimentElementActivityPredicate,
        DomainOptions::default(),
    )
    .unwrap();
    sediments.reset_age(0.0, false);
    assert_eq!(sediments.local_number_of_active_elements(), 1);
    assert_eq!(sediments.global_number_of_active_nodes(), 8);
    // The crust nodes below the sediment take no part.
    assert!(!sediments.is_node_active(0, 0, 0));
    assert!(sediments.is_node_active(0, 0, 2));

    let top_only = |_: &dyn Formation, element: &GeneralElement, _: f64| element.neighbour(Face::Shallow).is_none();
    let mut top = ComputationalDomain::new(
        StratigraphicColumn::new(&layers, 0, 1),
        &grid,
        &SerialComm,
        top_only,
        DomainOptions::default(),
    )
    .unwrap();
    top.reset_age(0.0, false);
    assert_eq!(top.local_number_of_active_elements(), 1);
    assert_eq!(top.active_element(0).layer_index(), 0);
}

#[test]
fn test_growing_column() {
    let layers = vec![
        sediment("top", 20.0, 0.0, 2, 5.0),
        sediment("base", 50.0, 20.0, 3, 5.0),
    ];
    let grid = LateralGrid::serial(2, 2).unwrap();
    let mut domain = domain(&layers, &grid, DomainOptions::default());

    let mut previous = 0;
    for age in [45.0, 30.0, 20.0, 15.0, 5.0, 0.0] {
        domain.reset_age(age, false);
        let count = domain.global_number_of_active_nodes();
        assert!(count >= previous);
        previous = count;
        let mapping = domain.local_to_global_mapping().unwrap();
        assert_eq!(mapping.len(), domain.local_number_of_active_nodes());
        assert_eq!(domain.dof_numbers().unwrap().length_k(), domain.number_of_nodes_in_depth());
    }
    assert_eq!(previous, 4 * 6);
}
