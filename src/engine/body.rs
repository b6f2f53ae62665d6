//! Minimal arcade body: gravity, a static ground and the world bounds.
use super::{Point, Rect, Size};

/// The actuator side of a physics body, as seen by game logic.
pub trait KinematicBody {
    fn set_velocity_x(&mut self, velocity: f32);
    fn set_velocity_y(&mut self, velocity: f32);
    /// resting against the world's bottom bound
    fn blocked_down(&self) -> bool;
    /// landed on another (static) body during the last step
    fn touching_down(&self) -> bool;

    fn on_floor(&self) -> bool {
        self.blocked_down() || self.touching_down()
    }
}

#[derive(Debug, Clone)]
pub struct ArcadeBody {
    position: Point,
    velocity: Point,
    size: Size,
    gravity: f32,
    world: Option<Size>,
    ground: Option<Rect>,
    blocked_down: bool,
    touching_down: bool,
}

impl ArcadeBody {
    /// `position` is the top left corner
    pub fn new(position: Point, size: Size) -> Self {
        ArcadeBody {
            position,
            velocity: Point::default(),
            size,
            gravity: 0.0,
            world: None,
            ground: None,
            blocked_down: false,
            touching_down: false,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// world spans from (0, 0) to `bounds`
    pub fn with_world_bounds(mut self, bounds: Size) -> Self {
        self.world = Some(bounds);
        self
    }

    pub fn collide_with(mut self, ground: Rect) -> Self {
        self.ground = Some(ground);
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width * 0.5,
            y: self.position.y + self.size.height * 0.5,
        }
    }

    /// ::step per frame
    /// - gravity -> velocity
    /// - velocity -> position
    /// - resolve ground + world bounds, recompute contact flags
    pub fn step(&mut self, delta_ms: f32) {
        let dt = delta_ms / 1000.0;
        let previous_bottom = self.bounding_box().bottom();

        self.velocity.y += self.gravity * dt;
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        self.blocked_down = false;
        self.touching_down = false;

        if let Some(ground) = self.ground {
            let body = self.bounding_box();
            let falling_onto = self.velocity.y >= 0.0
                && previous_bottom <= ground.y()
                && body.bottom() >= ground.y();
            if falling_onto && body.overlaps_horizontally(&ground) {
                self.position.y = ground.y() - self.size.height;
                self.velocity.y = 0.0;
                self.touching_down = true;
            }
        }

        if let Some(world) = self.world {
            let max_x = (world.width - self.size.width).max(0.0);
            if self.position.x < 0.0 || self.position.x > max_x {
                self.position.x = self.position.x.clamp(0.0, max_x);
                self.velocity.x = 0.0;
            }
            if self.position.y < 0.0 {
                self.position.y = 0.0;
                self.velocity.y = 0.0;
            }
            if self.bounding_box().bottom() >= world.height {
                self.position.y = world.height - self.size.height;
                self.velocity.y = 0.0;
                self.blocked_down = true;
            }
        }
    }
}

impl KinematicBody for ArcadeBody {
    fn set_velocity_x(&mut self, velocity: f32) {
        self.velocity.x = velocity;
    }

    fn set_velocity_y(&mut self, velocity: f32) {
        self.velocity.y = velocity;
    }

    fn blocked_down(&self) -> bool {
        self.blocked_down
    }

    fn touching_down(&self) -> bool {
        self.touching_down
    }
}
