use crate::config::Config;
use crate::leaf_identifier::core::{init, transition, Effect, Event, Model};
use crate::leaf_identifier::run_effect::RunEffect;
use crate::library::logger::interface::Logger;
use crate::plant_classifier::interface::PlantClassifier;
use crate::recent_images::interface::RecentImagesStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub type Waker = Arc<dyn Fn() + Send + Sync>;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the model and applies events to it. Effects run on their own
/// threads and report back through the channel.
#[derive(Clone)]
pub struct LeafIdentifier {
    pub config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model: Arc<Mutex<Model>>,
    event_sender: Sender<Event>,
    event_receiver: Arc<Mutex<Receiver<Event>>>,
    run_effect: RunEffect,
    ordered_sender: Sender<Effect>,
    in_flight: Arc<AtomicUsize>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl LeafIdentifier {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        plant_classifier: Arc<dyn PlantClassifier + Send + Sync>,
        recent_images_store: Arc<dyn RecentImagesStore + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let (model, _) = init(&config);
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            plant_classifier,
            recent_images_store,
            event_sender.clone(),
        );
        let in_flight = Arc::new(AtomicUsize::new(0));
        let waker: Arc<Mutex<Option<Waker>>> = Arc::new(Mutex::new(None));

        // saves must reach the store in the order they were issued
        let (ordered_sender, ordered_receiver) = channel::<Effect>();
        {
            let run_effect = run_effect.clone();
            let in_flight = in_flight.clone();
            let waker = waker.clone();
            std::thread::spawn(move || {
                for effect in ordered_receiver {
                    run_effect.run_effect(effect);
                    finish(&in_flight, &waker);
                }
            });
        }

        Self {
            config,
            logger: logger.with_namespace("leaf_identifier"),
            model: Arc::new(Mutex::new(model)),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            run_effect,
            ordered_sender,
            in_flight,
            waker,
        }
    }

    pub fn start(&self) {
        let (model, effects) = init(&self.config);
        *lock(&self.model) = model;
        self.spawn_effects(effects);
    }

    /// Called whenever an effect finishes, so a window can repaint.
    pub fn set_waker(&self, waker: Waker) {
        *lock(&self.waker) = Some(waker);
    }

    pub fn send(&self, event: Event) {
        let _ = self.event_sender.send(event);
    }

    pub fn model(&self) -> Model {
        lock(&self.model).clone()
    }

    /// Applies every queued event. Returns whether any was applied.
    pub fn update(&self) -> bool {
        let mut applied = false;
        loop {
            let event = lock(&self.event_receiver).try_recv();
            match event {
                Ok(event) => {
                    self.apply(event);
                    applied = true;
                }
                Err(_) => return applied,
            }
        }
    }

    /// Blocks until nothing is loading, no effect is running and no event is
    /// queued. Returns false when `timeout` runs out first.
    pub fn wait_until_settled(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let idle = self.in_flight.load(Ordering::SeqCst) == 0;
            let applied = self.update();
            if idle && !applied && !lock(&self.model).is_loading() {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let event = lock(&self.event_receiver).recv_timeout(POLL_INTERVAL.min(deadline - now));
            match event {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn apply(&self, event: Event) {
        let effects = {
            let mut model = lock(&self.model);
            let _ = self.logger.info(&format!("event: {:?}", event));
            let (new_model, effects) = transition(&self.config, model.clone(), event);
            let _ = self.logger.info(&format!(
                "phase: {:?} submission: {} effects: {}",
                new_model.phase,
                new_model.submission,
                effects.len()
            ));
            *model = new_model;
            effects
        };
        self.spawn_effects(effects);
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            if matches!(effect, Effect::SaveRecentImages { .. }) {
                if let Err(e) = self.ordered_sender.send(effect) {
                    let _ = self
                        .logger
                        .error(&format!("Save worker is gone, dropping {:?}", e.0));
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                continue;
            }
            let run_effect = self.run_effect.clone();
            let in_flight = self.in_flight.clone();
            let waker = self.waker.clone();
            std::thread::spawn(move || {
                run_effect.run_effect(effect);
                finish(&in_flight, &waker);
            });
        }
    }
}

fn finish(in_flight: &AtomicUsize, waker: &Mutex<Option<Waker>>) {
    in_flight.fetch_sub(1, Ordering::SeqCst);
    if let Some(wake) = lock(waker).clone() {
        wake();
    }
}
