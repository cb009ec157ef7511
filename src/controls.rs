use ::rand as external_rand;
use external_rand::Rng;
use macroquad::prelude::*;

use crate::simulation::Simulation;

pub fn handle_controls<R: Rng>(sim: &mut Simulation, rng: &mut R) {
    if is_key_pressed(KeyCode::Space) {
        sim.toggle_pause();
    }

    if is_key_pressed(KeyCode::R) {
        sim.reset(rng);
    }

    if is_key_pressed(KeyCode::A) {
        sim.toggle_agents_visibility();
    }

    // Speed controls ('+' shares a key with '=')
    if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
        sim.increase_speed();
    }
    if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
        sim.decrease_speed();
    }
    if is_key_pressed(KeyCode::Key0) {
        sim.reset_speed();
    }

    // Screenshot (P key)
    if is_key_pressed(KeyCode::P) {
        sim.take_screenshot = true;
    }

    if is_key_pressed(KeyCode::F1) {
        sim.help_popup_visible = !sim.help_popup_visible;
    }
}
