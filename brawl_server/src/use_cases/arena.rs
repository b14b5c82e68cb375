// The arena owns every piece of simulation state for one match: the physics world, the
// entity lists, scores and the round controller. Only the world task touches it.

use crate::domain::entities::{
    AnimationState, Buff, BuffKind, ClassKind, Platform, PlatformMotion, Player, PlayerId,
    Projectile, Weapon,
};
use crate::domain::errors::SimError;
use crate::domain::events::{MatchEvent, Scores};
use crate::domain::levels::{self, LEVEL_ORDER, LevelSpec, SCREEN_WIDTH};
use crate::domain::physics::{
    BodyDesc, BodyHandle, CollisionHandler, CollisionType, ContactEvent, ContactPhase, RigidBody,
    Shape, Vec2, World, is_finite, teleport,
};
use crate::domain::round::{Phase, RoundController, RoundEnd, RoundRules, pick_winner};
use crate::domain::state::{
    BuffSnapshot, PlatformSnapshot, PlayerInput, PlayerSnapshot, ProjectileSnapshot,
    WeaponSnapshot,
};
use crate::domain::systems::combat::{
    AttackMode, HitOutcome, Knockout, attack_mode, fire_projectile, resolve_melee,
    resolve_projectile_hit,
};
use crate::domain::systems::movement::{
    apply_movement, clamp_fall_speed, platform_pre_solve, supports, try_climb, update_climb,
};
use crate::domain::systems::pickups::{
    apply_buff, apply_easter_egg, collect_weapon, spawn_buff, spawn_queijada, spawn_weapon,
};
use crate::domain::systems::platforms::advance_platforms;
use crate::domain::systems::status::tick_timers;
use crate::domain::tuning::Tuning;
use crate::use_cases::types::{GameEvent, JoinAccepted, JoinError, ServerState, WorldUpdate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Player colors, handed out first-free.
pub const COLORS: [&str; 4] = ["red", "blue", "green", "yellow"];

/// Downward acceleration in pixels per second squared.
const GRAVITY: f32 = 900.0;
const DAMPING: f32 = 0.9;

pub struct Arena {
    world: World,
    tuning: Tuning,
    max_players: usize,
    rng: StdRng,
    round: RoundController,
    level: LevelSpec,
    players: Vec<Player>,
    platforms: Vec<Platform>,
    weapons: Vec<Weapon>,
    projectiles: Vec<Projectile>,
    buffs: Vec<Buff>,
    /// Join order, one entry per attached player.
    scores: Scores,
    /// Simulated seconds, drives platform motion.
    clock: f32,
    next_entity_id: u64,
    events: Vec<MatchEvent>,
}

impl Arena {
    /// Builds an arena on the first level of the rotation. `seed` makes every random
    /// decision reproducible.
    pub fn new(rules: RoundRules, tuning: Tuning, max_players: usize, seed: Option<u64>) -> Self {
        let mut world = World::new(Vec2::new(0.0, GRAVITY), DAMPING);
        register_handlers(&mut world);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut arena = Self {
            world,
            tuning,
            max_players,
            rng,
            round: RoundController::new(rules),
            level: levels::level_at(0),
            players: Vec::new(),
            platforms: Vec::new(),
            weapons: Vec::new(),
            projectiles: Vec::new(),
            buffs: Vec::new(),
            scores: Vec::new(),
            clock: 0.0,
            next_entity_id: 1,
            events: Vec::new(),
        };
        arena.load_level(0);
        arena.events.clear();
        arena
    }

    pub fn handle_event(&mut self, event: GameEvent) -> Result<(), SimError> {
        match event {
            GameEvent::Join { player_id, reply } => {
                let result = self.join(player_id);
                if reply.send(result).is_err() {
                    // The session went away while waiting; undo the join.
                    self.leave(player_id);
                }
                Ok(())
            }
            GameEvent::Leave { player_id } => {
                self.leave(player_id);
                Ok(())
            }
            GameEvent::Input { player_id, input } => self.apply_input(player_id, input),
            GameEvent::ChooseClass { player_id, class } => {
                self.choose_class(player_id, class);
                Ok(())
            }
            GameEvent::RequestLevelChange {
                player_id,
                level_name,
            } => {
                info!(player_id, level = %level_name, "level change requested");
                self.change_level(&level_name)
            }
        }
    }

    pub fn join(&mut self, player_id: PlayerId) -> Result<JoinAccepted, JoinError> {
        if self.players.len() >= self.max_players {
            return Err(JoinError::ServerFull);
        }
        if self.round.is_over() {
            return Err(JoinError::MatchOver);
        }

        let color = COLORS
            .iter()
            .copied()
            .find(|color| self.players.iter().all(|p| p.color != *color))
            .unwrap_or(COLORS[0]);
        let spawn = self.random_spawn();
        let tuning = self.tuning.player;
        let body = self.world.add(
            BodyDesc::dynamic(
                Shape::rect(tuning.width, tuning.height),
                CollisionType::Player,
                tuning.mass,
            )
            .at(spawn),
        );
        self.players.push(Player::new(player_id, body, color, spawn));
        self.scores.push((player_id, 0));
        info!(player_id, color, players = self.players.len(), "player joined");
        Ok(JoinAccepted { player_id, color })
    }

    /// Removes the player's body and score. The last player leaving resets the match.
    pub fn leave(&mut self, player_id: PlayerId) {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return;
        };
        let player = self.players.remove(index);
        self.world.remove(player.body);
        self.scores.retain(|(id, _)| *id != player_id);
        info!(player_id, players = self.players.len(), "player left");

        if self.players.is_empty() {
            self.reset_match();
        }
    }

    /// Class changes are refused while a round is running.
    pub fn choose_class(&mut self, player_id: PlayerId, class: ClassKind) {
        if self.round.is_active() {
            debug!(player_id, "class choice ignored during a round");
            return;
        }
        if let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) {
            player.apply_class(class);
            player.class_chosen = true;
            info!(player_id, class = class.as_str(), "class chosen");
        }
    }

    pub fn apply_input(&mut self, player_id: PlayerId, input: PlayerInput) -> Result<(), SimError> {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return Ok(());
        };
        let player = &mut self.players[index];
        let body = self
            .world
            .body_mut(player.body)
            .ok_or(SimError::MissingBody {
                entity: "player",
                id: player.id,
            })?;
        apply_movement(player, body, &input, &self.tuning.player);
        if input.climb {
            try_climb(player, &self.platforms, &self.tuning.player);
        }

        if input.attack && self.round.is_active() {
            self.attack(index)?;
        }
        Ok(())
    }

    /// Reloads a level by name and moves the rotation there. Unknown names load the first level.
    pub fn change_level(&mut self, level_name: &str) -> Result<(), SimError> {
        let index = levels::level_index(level_name).unwrap_or(0);
        self.round.level_index = index;
        self.load_level(index);
        for index in 0..self.players.len() {
            let spawn = self.random_spawn();
            self.relocate(index, spawn)?;
        }
        Ok(())
    }

    /// Advances the simulation by one fixed step.
    pub fn step(&mut self, dt: f32) -> Result<(), SimError> {
        if self.round.is_over() {
            return Ok(());
        }

        self.clock += dt;
        advance_platforms(&mut self.world, &mut self.platforms, self.clock)?;
        for player in &mut self.players {
            let body = self
                .world
                .body_mut(player.body)
                .ok_or(SimError::MissingBody {
                    entity: "player",
                    id: player.id,
                })?;
            update_climb(player, body, &self.tuning.player);
            clamp_fall_speed(body, &self.tuning.player);
        }

        self.world.step(dt);
        self.sync_bodies()?;
        self.expire_transients();
        self.handle_contacts()?;
        if self.round.is_over() {
            return Ok(());
        }
        self.update_players(dt)?;
        self.spawn_pickups();
        self.update_round(dt)
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn server_state(&self) -> ServerState {
        match self.round.phase {
            Phase::Waiting => ServerState::Lobby,
            Phase::Countdown { remaining } => ServerState::MatchStarting {
                in_seconds: remaining.ceil().max(0.0) as u32,
            },
            Phase::Active => ServerState::MatchRunning,
            Phase::GameOver => ServerState::MatchEnded,
        }
    }

    pub fn snapshot(&self, tick: u64) -> WorldUpdate {
        WorldUpdate {
            tick,
            level: self.level.key,
            round: self.round.round,
            max_rounds: self.round.rules.max_rounds,
            round_timer: self.round.timer,
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            weapons: self.weapons.iter().map(WeaponSnapshot::from).collect(),
            platforms: self.platforms.iter().map(PlatformSnapshot::from).collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
            buffs: self.buffs.iter().map(BuffSnapshot::from).collect(),
            scores: self.scores.clone(),
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    fn random_spawn(&mut self) -> Vec2 {
        let points = &self.level.spawn_points;
        if points.is_empty() {
            return Vec2::new(SCREEN_WIDTH / 2.0, 0.0);
        }
        points[self.rng.gen_range(0..points.len())]
    }

    fn relocate(&mut self, index: usize, position: Vec2) -> Result<(), SimError> {
        let player = &mut self.players[index];
        let body = self
            .world
            .body_mut(player.body)
            .ok_or(SimError::MissingBody {
                entity: "player",
                id: player.id,
            })?;
        teleport(body, position);
        player.position = position;
        player.velocity = Vec2::zeros();
        Ok(())
    }

    /// Swaps the level geometry and clears every transient entity.
    fn load_level(&mut self, index: usize) {
        let stale: Vec<BodyHandle> = self
            .platforms
            .drain(..)
            .map(|p| p.body)
            .chain(self.weapons.drain(..).map(|w| w.body))
            .chain(self.buffs.drain(..).map(|b| b.body))
            .chain(self.projectiles.drain(..).map(|p| p.body))
            .collect();
        for handle in stale {
            self.world.remove(handle);
        }

        self.level = levels::level_at(index);
        for spec in &self.level.platforms {
            let anchor = Vec2::new(spec.x, spec.y);
            let shape = Shape::rect(spec.width, spec.height);
            let body = match spec.motion {
                PlatformMotion::Static => BodyDesc::fixed(shape, CollisionType::Platform),
                _ => BodyDesc::kinematic_position_based(shape, CollisionType::Platform),
            };
            let body = self.world.add(body.at(anchor).as_one_way(spec.one_way));
            self.platforms.push(Platform {
                body,
                width: spec.width,
                height: spec.height,
                motion: spec.motion,
                anchor,
                position: anchor,
            });
        }
        debug!(level = self.level.key, platforms = self.platforms.len(), "level loaded");
        self.events.push(MatchEvent::LevelChanged {
            level_name: self.level.key,
            level_title: self.level.title,
        });
    }

    fn reset_match(&mut self) {
        self.round.reset();
        self.load_level(0);
        self.scores.clear();
        info!("arena empty; match reset");
    }

    /// Full status reset at a round start, spawning players in join order.
    fn reset_players(&mut self) -> Result<(), SimError> {
        let spawn_count = self.level.spawn_points.len().max(1);
        for index in 0..self.players.len() {
            let player = &mut self.players[index];
            player.weapon = Some(player.class.stats().weapon);
            player.reset_status();
            let spawn = self
                .level
                .spawn_points
                .get(index % spawn_count)
                .copied()
                .unwrap_or(Vec2::new(SCREEN_WIDTH / 2.0, 0.0));
            self.relocate(index, spawn)?;
        }
        Ok(())
    }

    fn sync_bodies(&mut self) -> Result<(), SimError> {
        for player in &mut self.players {
            let body = synced(&self.world, player.body, "player", player.id)?;
            player.position = *body.translation();
            player.velocity = *body.linvel();
        }
        for projectile in &mut self.projectiles {
            let body = synced(&self.world, projectile.body, "projectile", projectile.id)?;
            projectile.position = *body.translation();
            projectile.velocity = *body.linvel();
        }
        for weapon in &mut self.weapons {
            let body = synced(&self.world, weapon.body, "weapon", weapon.id)?;
            weapon.position = *body.translation();
        }
        Ok(())
    }

    /// Projectiles leaving the screen and weapons falling out of the level are dropped before
    /// any of their contacts are handled.
    fn expire_transients(&mut self) {
        let level = &self.level;
        let (kept, gone): (Vec<Projectile>, Vec<Projectile>) = self
            .projectiles
            .drain(..)
            .partition(|p| level.contains(p.position));
        self.projectiles = kept;
        for projectile in gone {
            self.world.remove(projectile.body);
        }

        let lower_bound = level.lower_bound();
        let (kept, gone): (Vec<Weapon>, Vec<Weapon>) = self
            .weapons
            .drain(..)
            .partition(|w| w.position.y <= lower_bound);
        self.weapons = kept;
        for weapon in gone {
            self.world.remove(weapon.body);
        }
    }

    fn handle_contacts(&mut self) -> Result<(), SimError> {
        for event in self.world.drain_events() {
            if self.round.is_over() {
                break;
            }
            if event.is(
                ContactPhase::PreSolve,
                CollisionType::Platform,
                CollisionType::Player,
            ) {
                self.ground_player(&event);
            } else if event.is(
                ContactPhase::Separate,
                CollisionType::Platform,
                CollisionType::Player,
            ) {
                if let Some(player) = self.players.iter_mut().find(|p| p.body == event.b) {
                    player.can_jump = false;
                }
            } else if event.is(
                ContactPhase::Begin,
                CollisionType::Projectile,
                CollisionType::Player,
            ) {
                self.projectile_hit(event.a, event.b)?;
            } else if event.is(
                ContactPhase::Begin,
                CollisionType::Player,
                CollisionType::Pickup,
            ) {
                self.collect_pickup(event.a, event.b);
            }
        }
        Ok(())
    }

    fn ground_player(&mut self, event: &ContactEvent) {
        let (Some(platform), Some(rider)) = (self.world.body(event.a), self.world.body(event.b))
        else {
            return;
        };
        if !supports(event.normal, *platform.linvel(), *rider.linvel()) {
            return;
        }
        if let Some(player) = self.players.iter_mut().find(|p| p.body == event.b) {
            player.can_jump = true;
        }
    }

    fn projectile_hit(
        &mut self,
        projectile_body: BodyHandle,
        player_body: BodyHandle,
    ) -> Result<(), SimError> {
        let Some(projectile_index) = self
            .projectiles
            .iter()
            .position(|p| p.body == projectile_body)
        else {
            return Ok(());
        };
        let Some(defender_index) = self.players.iter().position(|p| p.body == player_body) else {
            return Ok(());
        };

        let outcome = resolve_projectile_hit(
            &self.projectiles[projectile_index],
            defender_index,
            &mut self.players,
            &mut self.world,
            &self.tuning.projectile,
            &self.tuning.player,
            &mut self.events,
        )?;
        if let HitOutcome::Consumed { knockout } = outcome {
            let projectile = self.projectiles.remove(projectile_index);
            self.world.remove(projectile.body);
            if let Some(knockout) = knockout {
                self.knock_out(knockout)?;
            }
        }
        Ok(())
    }

    fn collect_pickup(&mut self, player_body: BodyHandle, pickup_body: BodyHandle) {
        let Some(index) = self.players.iter().position(|p| p.body == player_body) else {
            return;
        };

        if let Some(weapon_index) = self.weapons.iter().position(|w| w.body == pickup_body) {
            let weapon = self.weapons.remove(weapon_index);
            self.world.remove(weapon.body);
            let player = &mut self.players[index];
            collect_weapon(player, &weapon);
            self.events.push(MatchEvent::WeaponCollected {
                player: player.id,
                weapon: weapon.kind,
            });
        } else if let Some(buff_index) = self.buffs.iter().position(|b| b.body == pickup_body) {
            let buff = self.buffs.remove(buff_index);
            self.world.remove(buff.body);
            let player = &mut self.players[index];
            apply_buff(player, buff.kind, &self.tuning.pickups);
            let event = match buff.kind {
                BuffKind::Queijada => MatchEvent::GotQueijada { player: player.id },
                kind => MatchEvent::BuffCollected {
                    player: player.id,
                    buff: kind,
                },
            };
            self.events.push(event);
        }
    }

    fn attack(&mut self, index: usize) -> Result<(), SimError> {
        let player = &mut self.players[index];
        if player.attack_cooldown > 0.0 {
            return Ok(());
        }
        let Some(mode) = attack_mode(player.class, player.weapon) else {
            return Ok(());
        };
        player.attack_cooldown = self.tuning.player.attack_cooldown;
        player.play(
            AnimationState::Attacking,
            self.tuning.player.action_animation_seconds,
        );

        match mode {
            AttackMode::Melee => {
                let knockouts = resolve_melee(
                    index,
                    &mut self.players,
                    &mut self.world,
                    &self.tuning.combat,
                    &self.tuning.player,
                    &mut self.events,
                );
                for knockout in knockouts {
                    self.knock_out(knockout)?;
                }
            }
            AttackMode::Ranged => {
                let id = self.next_id();
                let shooter = &self.players[index];
                let projectile =
                    fire_projectile(shooter, &mut self.world, &self.tuning.projectile, id);
                self.events.push(MatchEvent::Shoot {
                    attacker: shooter.id,
                    class: shooter.class,
                    direction: shooter.facing_sign(),
                });
                self.projectiles.push(projectile);
            }
        }
        Ok(())
    }

    /// Respawns the victim and credits the killer, if any.
    fn knock_out(&mut self, knockout: Knockout) -> Result<(), SimError> {
        let Some(index) = self.players.iter().position(|p| p.id == knockout.victim) else {
            return Ok(());
        };
        let spawn = self.random_spawn();
        let player = &mut self.players[index];
        player.health = player.max_health;
        player.weapon = Some(player.class.stats().weapon);
        self.relocate(index, spawn)?;
        self.events.push(MatchEvent::PlayerDied {
            player: knockout.victim,
            killer: knockout.killer,
        });
        info!(
            player_id = knockout.victim,
            killer = ?knockout.killer,
            "player died"
        );

        let Some(killer) = knockout.killer else {
            return Ok(());
        };
        if self
            .add_point(killer)
            .is_some_and(|score| self.round.reaches_score_limit(score))
        {
            self.game_over();
        }
        Ok(())
    }

    fn add_point(&mut self, player_id: PlayerId) -> Option<u32> {
        let entry = self.scores.iter_mut().find(|(id, _)| *id == player_id)?;
        entry.1 += 1;
        Some(entry.1)
    }

    fn update_players(&mut self, dt: f32) -> Result<(), SimError> {
        let lower_bound = self.level.lower_bound();
        for index in 0..self.players.len() {
            tick_timers(&mut self.players[index], dt);

            if self.players[index].position.y <= lower_bound {
                continue;
            }
            let player = &mut self.players[index];
            debug!(player_id = player.id, "fell out of the level");
            if player.take_damage(self.tuning.player.fall_damage) {
                let victim = player.id;
                self.knock_out(Knockout {
                    victim,
                    killer: None,
                })?;
            } else {
                let spawn = self.random_spawn();
                self.relocate(index, spawn)?;
            }
        }
        Ok(())
    }

    fn spawn_pickups(&mut self) {
        let tuning = self.tuning.pickups;
        if self.weapons.len() < tuning.max_weapons && self.rng.gen_bool(tuning.weapon_spawn_chance)
        {
            let id = self.next_id();
            let weapon = spawn_weapon(&mut self.world, &tuning, &mut self.rng, id);
            self.weapons.push(weapon);
        }

        let field_buffs = self
            .buffs
            .iter()
            .filter(|b| b.kind != BuffKind::Queijada)
            .count();
        if field_buffs < tuning.max_buffs && self.rng.gen_bool(tuning.buff_spawn_chance) {
            let id = self.next_id();
            let buff = spawn_buff(&mut self.world, &tuning, &mut self.rng, id);
            self.buffs.push(buff);
        }

        if self.round.is_active() && self.rng.gen_bool(tuning.easter_egg_chance) {
            apply_easter_egg(&mut self.players, &tuning);
            self.events.push(MatchEvent::EasterEgg);
            info!("easter egg");
        }
    }

    fn update_round(&mut self, dt: f32) -> Result<(), SimError> {
        let ready = self.players.iter().filter(|p| p.class_chosen).count();
        let was_active = self.round.is_active();
        let tick = self.round.advance(dt, ready, &self.scores);

        if tick.started {
            info!(round = self.round.round + 1, level = self.level.key, "round started");
            self.reset_players()?;
        }
        if !was_active {
            return Ok(());
        }

        if tick.spawn_queijada {
            let id = self.next_id();
            let queijada = spawn_queijada(
                &mut self.world,
                &self.platforms,
                &self.tuning.pickups,
                &mut self.rng,
                id,
            );
            self.events.push(MatchEvent::QueijadaSpawned {
                x: queijada.position.x,
                y: queijada.position.y,
            });
            self.buffs.push(queijada);
        }

        let holder = self
            .players
            .iter()
            .find(|p| p.has_queijada)
            .map(|p| p.id);
        if let Some(holder) = holder {
            let score = self.add_point(holder).unwrap_or(0);
            if self.round.reaches_score_limit(score) {
                self.game_over();
                return Ok(());
            }
            self.end_round(Some(holder))
        } else if tick.pombo {
            let (queijadas, rest): (Vec<Buff>, Vec<Buff>) = self
                .buffs
                .drain(..)
                .partition(|b| b.kind == BuffKind::Queijada);
            self.buffs = rest;
            for queijada in queijadas {
                self.world.remove(queijada.body);
            }
            self.events.push(MatchEvent::PomboRoubou);
            self.end_round(None)
        } else if tick.time_up {
            let winner = self.healthiest();
            self.end_round(winner)
        } else {
            Ok(())
        }
    }

    /// Sole healthiest player, if there is one.
    fn healthiest(&self) -> Option<PlayerId> {
        let top = self.players.iter().map(|p| p.health).max()?;
        let mut leaders = self.players.iter().filter(|p| p.health == top);
        let first = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(first.id)
        }
    }

    fn end_round(&mut self, winner: Option<PlayerId>) -> Result<(), SimError> {
        match self.round.finish_round(LEVEL_ORDER.len()) {
            RoundEnd::NextRound { level_index } => {
                self.load_level(level_index);
                self.reset_players()?;
                info!(
                    round = self.round.round,
                    level = self.level.key,
                    winner = ?winner,
                    "round finished"
                );
                self.events.push(MatchEvent::RoundChange {
                    next_level: self.level.key,
                    round: self.round.round,
                    max_rounds: self.round.rules.max_rounds,
                    scores: self.scores.clone(),
                    winner,
                });
                Ok(())
            }
            RoundEnd::GameOver => {
                self.game_over();
                Ok(())
            }
        }
    }

    fn game_over(&mut self) {
        self.round.end_match();
        let winner = pick_winner(&self.scores, &mut self.rng);
        info!(winner = ?winner, rounds = self.round.round, "match over");
        self.events.push(MatchEvent::GameOver {
            winner,
            scores: self.scores.clone(),
        });
    }
}

fn register_handlers(world: &mut World) {
    world.set_handler(
        CollisionType::Platform,
        CollisionType::Player,
        CollisionHandler::solid().with_pre_solve(platform_pre_solve),
    );
    world.set_handler(
        CollisionType::Platform,
        CollisionType::Pickup,
        CollisionHandler::solid().with_pre_solve(platform_pre_solve),
    );
    world.set_handler(
        CollisionType::Player,
        CollisionType::Player,
        CollisionHandler::solid(),
    );
    world.set_handler(
        CollisionType::Projectile,
        CollisionType::Player,
        CollisionHandler::sensor(),
    );
    world.set_handler(
        CollisionType::Player,
        CollisionType::Pickup,
        CollisionHandler::sensor(),
    );
}

fn synced<'a>(
    world: &'a World,
    handle: BodyHandle,
    entity: &'static str,
    id: u64,
) -> Result<&'a RigidBody, SimError> {
    let body = world
        .body(handle)
        .ok_or(SimError::MissingBody { entity, id })?;
    if !is_finite(body.translation()) || !is_finite(body.linvel()) {
        return Err(SimError::NonFinite { entity, id });
    }
    Ok(body)
}
