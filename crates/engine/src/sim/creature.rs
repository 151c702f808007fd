use super::body::Body;

/// Lifecycle of a creature. Ordered so that transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifeState {
    Alive,
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// What a creature does with its horizontal velocity after hitting a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    Stop,
    Reverse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    body: Body,
    state: LifeState,
    state_time_ms: f32,
    facing: Facing,
    flying: bool,
    grounded: bool,
    max_speed: f32,
    wall_response: WallResponse,
}

impl Creature {
    pub fn new(body: Body, max_speed: f32, flying: bool, wall_response: WallResponse) -> Self {
        Self {
            body,
            state: LifeState::Alive,
            state_time_ms: 0.0,
            facing: Facing::Left,
            flying,
            grounded: false,
            max_speed,
            wall_response,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub(crate) fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub(crate) fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Flying creatures ignore gravity, but only while alive.
    pub fn is_flying(&self) -> bool {
        self.flying && self.is_alive()
    }

    /// Moves the lifecycle forward. Backward or repeated transitions are
    /// ignored and return `false`. Entering `Dying` stops the creature.
    pub fn set_state(&mut self, state: LifeState) -> bool {
        if state <= self.state {
            return false;
        }
        self.state = state;
        self.state_time_ms = 0.0;
        if state == LifeState::Dying {
            self.body.velocity.x = 0.0;
            self.body.velocity.y = 0.0;
        }
        true
    }

    /// Advances the state clock; a creature that has been dying for at least
    /// `die_time_ms` becomes dead.
    pub fn update(&mut self, dt_ms: f32, die_time_ms: f32) {
        self.state_time_ms += dt_ms;
        if self.state == LifeState::Dying && self.state_time_ms >= die_time_ms {
            self.set_state(LifeState::Dead);
        }
    }

    /// Facing follows the sign of horizontal velocity; standing still faces left.
    pub(crate) fn update_facing(&mut self) {
        self.facing = if self.body.velocity.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };
    }

    pub(crate) fn set_x(&mut self, x: f32) {
        self.body.position.x = x;
    }

    /// Sets the vertical position, clearing the grounded flag when the
    /// creature moves down by at least one rounded pixel.
    pub(crate) fn set_y(&mut self, y: f32) {
        if (y + 0.5).floor() > (self.body.position.y + 0.5).floor() {
            self.grounded = false;
        }
        self.body.position.y = y;
    }

    pub(crate) fn collide_horizontal(&mut self) {
        match self.wall_response {
            WallResponse::Stop => self.body.velocity.x = 0.0,
            WallResponse::Reverse => self.body.velocity.x = -self.body.velocity.x,
        }
    }

    pub(crate) fn collide_vertical(&mut self) {
        if self.body.velocity.y > 0.0 {
            self.grounded = true;
        }
        self.body.velocity.y = 0.0;
    }

    /// Starts a sleeping creature walking left at full speed.
    pub fn wake_up(&mut self) {
        if self.is_alive() && self.body.velocity.x == 0.0 {
            self.body.velocity.x = -self.max_speed;
        }
    }
}
