//! Sample design shown on startup

use floorplan_core::{FloorplanError, Item, Model};
use glam::Vec3;

/// Two rooms sharing a wall, furnished with a few items
pub fn demo_model() -> Result<Model, FloorplanError> {
    let mut model = Model::new();
    let plan = model.floorplan_mut();

    let a = plan.add_corner(0.0, 0.0);
    let b = plan.add_corner(400.0, 0.0);
    let c = plan.add_corner(400.0, 300.0);
    let d = plan.add_corner(0.0, 300.0);
    let e = plan.add_corner(700.0, 0.0);
    let f = plan.add_corner(700.0, 300.0);

    for (start, end) in [(a, b), (b, c), (c, d), (d, a), (b, e), (e, f), (f, c)] {
        plan.add_wall(start, end)?;
    }
    plan.add_room(Some("Living room".to_string()), vec![a, b, c, d])?;
    plan.add_room(Some("Kitchen".to_string()), vec![b, e, f, c])?;

    model.load_items(vec![
        Item::new("Sofa")
            .with_position(Vec3::new(150.0, 0.0, 240.0))
            .with_dimensions(Vec3::new(200.0, 85.0, 90.0))
            .with_color([0.35, 0.45, 0.6, 1.0]),
        Item::new("Coffee table")
            .with_position(Vec3::new(150.0, 0.0, 120.0))
            .with_dimensions(Vec3::new(110.0, 45.0, 60.0))
            .with_color([0.55, 0.4, 0.28, 1.0]),
        Item::new("Counter")
            .with_position(Vec3::new(550.0, 0.0, 30.0))
            .with_dimensions(Vec3::new(240.0, 90.0, 60.0))
            .fixed(),
    ]);

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{FloorplanEvent, ModelEvent};

    #[test]
    fn test_demo_layout() {
        let model = demo_model().unwrap();
        let plan = model.floorplan();
        assert_eq!(plan.walls().len(), 7);
        assert_eq!(plan.rooms().len(), 2);
        assert_eq!(model.items().len(), 3);
        assert_eq!(model.items().iter().filter(|i| i.fixed).count(), 1);
    }

    #[test]
    fn test_demo_queues_initial_events() {
        let mut model = demo_model().unwrap();
        let (model_events, plan_events) = model.drain_all_events();
        assert!(model_events.contains(&ModelEvent::Loaded));
        assert!(plan_events.contains(&FloorplanEvent::NewRoomsAdded));
    }
}
