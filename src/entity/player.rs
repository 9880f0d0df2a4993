use crate::engine::input::InputState;
use crate::engine::{Point, Renderer};

// tuning values carried over from the page prototype
const MOVEMENT_SPEED: f64 = 4.0;
const ATTACK_COOLDOWN_TICKS: u32 = 30;
const ATTACK_RADIUS: f64 = 120.0;
const SUMMON_COOLDOWN_TICKS: u32 = 90;
const SUMMON_RADIUS: f64 = 160.0;
const BODY_SIZE: f64 = 40.0;
const FACING_MARK_SIZE: f64 = 20.0;

const ATTACK_RING_COLOR: &str = "#fcdcec";
const ATTACK_PULSE_COLOR: &str = "#f53b98";
const SUMMON_RING_COLOR: &str = "#dcfce4";
const SUMMON_PULSE_COLOR: &str = "#3bf580";
const BODY_COLOR: &str = "#2015e7";
const FACING_MARK_COLOR: &str = "#ffffff";

/// Which of the two charged actions the left button triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Attack,
    Summon,
}

impl Usage {
    fn toggled(self) -> Self {
        match self {
            Usage::Attack => Usage::Summon,
            Usage::Summon => Usage::Attack,
        }
    }
}

/// A cooldown-gated area action. The cooldown counter decrements once
/// per tick until zero; triggering resets it to the default and records
/// the pointer position the action was aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargedAction {
    cooldown: u32,
    cooldown_default: u32,
    radius: f64,
    origin: Point,
}

impl ChargedAction {
    fn new(cooldown_default: u32, radius: f64) -> Self {
        ChargedAction {
            cooldown: 0,
            cooldown_default,
            radius,
            origin: Point::default(),
        }
    }

    fn tick(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    fn ready(&self) -> bool {
        self.cooldown == 0
    }

    fn trigger(&mut self, origin: Point) {
        self.cooldown = self.cooldown_default;
        self.origin = origin;
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Radius of the shrinking inner circle: interpolates linearly from
    /// the action radius down to zero over the cooldown countdown.
    pub fn pulse_radius(&self) -> f64 {
        self.radius / self.cooldown_default as f64 * self.cooldown as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Point,
    angle: f64,
    usage: Usage,
    attack: ChargedAction,
    summon: ChargedAction,
}

impl Player {
    pub fn new(position: Point) -> Self {
        Player {
            position,
            angle: 0.0,
            usage: Usage::Attack,
            attack: ChargedAction::new(ATTACK_COOLDOWN_TICKS, ATTACK_RADIUS),
            summon: ChargedAction::new(SUMMON_COOLDOWN_TICKS, SUMMON_RADIUS),
        }
    }

    pub fn advance(&mut self, input: &InputState) {
        self.attack.tick();
        self.summon.tick();

        // each wheel detent flips between attack and summon
        for _ in 0..input.wheel_turns() {
            self.usage = self.usage.toggled();
        }

        match self.usage {
            Usage::Attack => {
                if input.left_button() && self.attack.ready() {
                    // TODO: kill enemies inside the ring; a killed enemy
                    // should re-enter the registry as a DeadEnemy.
                    self.attack.trigger(input.pointer());
                }
            }
            Usage::Summon => {
                if input.left_button() && self.summon.ready() {
                    // TODO: convert decaying corpses inside the ring into
                    // friendlies.
                    self.summon.trigger(input.pointer());
                }
            }
        }

        // rotate to look at the pointer
        self.angle = calc_angle_degrees(
            input.pointer().x - self.position.x,
            input.pointer().y - self.position.y,
        );

        // each axis resolves to at most one direction per tick; the two
        // axes combine freely, so diagonals run at full speed on both
        if input.is_pressed("w") {
            self.position.y -= MOVEMENT_SPEED;
        } else if input.is_pressed("s") {
            self.position.y += MOVEMENT_SPEED;
        }

        if input.is_pressed("a") {
            self.position.x -= MOVEMENT_SPEED;
        } else if input.is_pressed("d") {
            self.position.x += MOVEMENT_SPEED;
        }
    }

    pub fn render(&self, renderer: &Renderer) {
        let (ring_color, pulse_color, action) = match self.usage {
            Usage::Attack => (ATTACK_RING_COLOR, ATTACK_PULSE_COLOR, &self.attack),
            Usage::Summon => (SUMMON_RING_COLOR, SUMMON_PULSE_COLOR, &self.summon),
        };

        renderer.with_transform(self.position, (self.angle + 45.0).to_radians(), |r| {
            r.draw_circle(0.0, 0.0, action.radius(), Some(ring_color));
            r.draw_circle(0.0, 0.0, action.pulse_radius(), Some(pulse_color));

            r.draw_circle(0.0, 0.0, BODY_SIZE, Some(BODY_COLOR));
            r.draw_square(0.0, 0.0, FACING_MARK_SIZE, Some(FACING_MARK_COLOR));
        });
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn attack(&self) -> &ChargedAction {
        &self.attack
    }

    pub fn summon(&self) -> &ChargedAction {
        &self.summon
    }
}

fn calc_angle_degrees(x: f64, y: f64) -> f64 {
    y.atan2(x).to_degrees()
}
