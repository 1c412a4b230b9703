//! Collaborator interfaces
//!
//! The generator only decides what exists; a `GeometryEmitter` turns the
//! descriptors into renderable/collidable objects and a `CourseSink` wires
//! checkpoint and finish triggers.

use glam::Vec3;

use crate::course::{Checkpoint, Course, ObstaclePlacement, ShapeDescriptor};

/// Creates engine objects from descriptors
pub trait GeometryEmitter {
    /// Opaque engine handle
    type Handle;

    /// Create one shape; `origin` is the world position its transform is relative to
    fn create_shape(&mut self, origin: Vec3, shape: &ShapeDescriptor) -> Self::Handle;

    /// Create the obstacle's behavior root and bind its frozen parameters
    fn attach_obstacle(&mut self, origin: Vec3, placement: &ObstaclePlacement) -> Self::Handle;
}

/// Receives respawn anchors and the finish line once generation completes
pub trait CourseSink {
    fn wire_checkpoints(&mut self, start: Vec3, checkpoints: &[Checkpoint]);
    fn wire_finish(&mut self, finish: Vec3, trigger: Vec3);
}

/// Handles created for a course, grouped the way the course is
#[derive(Debug)]
pub struct EmittedCourse<H> {
    pub start_platform: Vec<H>,
    /// Per segment: floor/wall/platform handles
    pub segments: Vec<Vec<H>>,
    /// Per obstacle: behavior root first, then its parts
    pub obstacles: Vec<Vec<H>>,
    pub checkpoints: Vec<Vec<H>>,
    pub finish_platform: Vec<H>,
}

impl Course {
    /// Replay every descriptor into `emitter` in stable arena order
    pub fn emit_into<E: GeometryEmitter>(&self, emitter: &mut E) -> EmittedCourse<E::Handle> {
        let start_platform = self
            .shapes_in(self.start_platform)
            .iter()
            .map(|shape| emitter.create_shape(Vec3::ZERO, shape))
            .collect();

        let mut segments = Vec::with_capacity(self.segments.len());
        let mut obstacles = Vec::with_capacity(self.obstacles.len());
        for segment in &self.segments {
            segments.push(
                self.shapes_in(segment.geometry)
                    .iter()
                    .map(|shape| emitter.create_shape(segment.start, shape))
                    .collect(),
            );

            for placement in self.obstacles_in(segment.obstacles) {
                let mut handles = vec![emitter.attach_obstacle(segment.start, placement)];
                let pivot = segment.start + placement.pivot;
                handles.extend(
                    placement
                        .parts
                        .iter()
                        .map(|part| emitter.create_shape(pivot, part)),
                );
                obstacles.push(handles);
            }
        }

        let checkpoints = self
            .checkpoints
            .iter()
            .map(|checkpoint| {
                self.shapes_in(checkpoint.markers)
                    .iter()
                    .map(|shape| emitter.create_shape(checkpoint.position, shape))
                    .collect()
            })
            .collect();

        let finish_platform = self
            .shapes_in(self.finish_platform)
            .iter()
            .map(|shape| emitter.create_shape(self.finish_position, shape))
            .collect();

        EmittedCourse {
            start_platform,
            segments,
            obstacles,
            checkpoints,
            finish_platform,
        }
    }
}

/// One object created by a [`SceneRecorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedObject {
    Shape { name: String, world_position: Vec3 },
    Obstacle { placement: ObstaclePlacement, world_pivot: Vec3 },
}

/// In-memory emitter and sink; handles are indices into `objects`
#[derive(Debug, Default)]
pub struct SceneRecorder {
    pub objects: Vec<RecordedObject>,
    pub respawn_points: Vec<Vec3>,
    pub finish: Option<(Vec3, Vec3)>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, RecordedObject::Shape { .. }))
            .count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.objects.len() - self.shape_count()
    }
}

impl GeometryEmitter for SceneRecorder {
    type Handle = usize;

    fn create_shape(&mut self, origin: Vec3, shape: &ShapeDescriptor) -> usize {
        self.objects.push(RecordedObject::Shape {
            name: shape.name.clone(),
            world_position: origin + shape.transform.position,
        });
        self.objects.len() - 1
    }

    fn attach_obstacle(&mut self, origin: Vec3, placement: &ObstaclePlacement) -> usize {
        self.objects.push(RecordedObject::Obstacle {
            placement: placement.clone(),
            world_pivot: origin + placement.pivot,
        });
        self.objects.len() - 1
    }
}

impl CourseSink for SceneRecorder {
    fn wire_checkpoints(&mut self, start: Vec3, checkpoints: &[Checkpoint]) {
        self.respawn_points = std::iter::once(start)
            .chain(checkpoints.iter().map(Checkpoint::respawn_position))
            .collect();
    }

    fn wire_finish(&mut self, finish: Vec3, trigger: Vec3) {
        self.finish = Some((finish, trigger));
    }
}
