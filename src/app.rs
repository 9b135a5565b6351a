use chrono::{Duration, Local, NaiveDate};

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{
    ChecklistItem, DayCompletion, Language, Mood, MoodLog, Quote, Routine, RoutineStatus, User,
};
use crate::services::{quotes, routines, store, users};
use crate::tui::AppAction;

/// Days shown on the history screen, today included.
const HISTORY_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Quote,
    Routine,
    Mood,
    Complete,
    Favorites,
    History,
    Manage,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Quote => Screen::Routine,
            Screen::Routine => Screen::Mood,
            Screen::Mood => Screen::Complete,
            other => other,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Screen::Routine => Screen::Quote,
            Screen::Mood => Screen::Routine,
            Screen::Complete => Screen::Mood,
            other => other,
        }
    }

    pub fn is_side(self) -> bool {
        matches!(self, Screen::Favorites | Screen::History | Screen::Manage)
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Quote => "Good Morning",
            Screen::Routine => "Morning Routine",
            Screen::Mood => "How do you feel?",
            Screen::Complete => "Morning Complete",
            Screen::Favorites => "Favorite Quotes",
            Screen::History => "History",
            Screen::Manage => "Edit Routines",
        }
    }
}

pub struct App {
    // Data
    pub user: User,
    pub language: Language,
    pub today: NaiveDate,
    pub quote: Quote,
    pub is_favorite: bool,
    pub checklist: Vec<ChecklistItem>,
    pub routines: Vec<Routine>,
    pub mood: Option<Mood>,
    pub favorites: Vec<Quote>,
    pub history: Vec<DayCompletion>,
    pub mood_history: Vec<MoodLog>,
    pub streak: u32,
    pub viewed_count: u32,

    // UI State
    pub screen: Screen,
    return_screen: Screen,
    pub selected_index: usize,
    pub show_help: bool,
    pub celebrating: bool,
    pub routine_input_active: bool,
    pub routine_input: String,
    pub status_message: Option<String>,
    tutorial_pending: bool,

    // Services
    pub repository: Repository,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = store::open(config).await?;
        let user = users::ensure_active_user(&repository, config).await?;
        let tutorial_pending = !repository.is_tutorial_completed().await.unwrap_or(false);

        let mut app = Self {
            user,
            language: config.language,
            today: Local::now().date_naive(),
            quote: Quote::fallback(),
            is_favorite: false,
            checklist: Vec::new(),
            routines: Vec::new(),
            mood: None,
            favorites: Vec::new(),
            history: Vec::new(),
            mood_history: Vec::new(),
            streak: 0,
            viewed_count: 0,
            screen: Screen::Quote,
            return_screen: Screen::Quote,
            selected_index: 0,
            show_help: tutorial_pending,
            celebrating: false,
            routine_input_active: false,
            routine_input: String::new(),
            status_message: None,
            tutorial_pending,
            repository,
        };
        app.load_day().await;
        Ok(app)
    }

    pub async fn load_day(&mut self) {
        let repo = &self.repository;
        let user_id = self.user.id.as_str();

        self.quote = quotes::todays_quote(repo, user_id, self.today).await;
        self.is_favorite = quotes::is_favorite(repo, user_id, &self.quote).await;
        self.checklist = routines::todays_checklist(repo, user_id, self.today).await;
        self.mood = match repo.get_mood_log(user_id, self.today).await {
            Ok(log) => log.map(|l| l.mood),
            Err(e) => {
                tracing::warn!("Failed to load today's mood: {}", e);
                None
            }
        };
        self.refresh_stats().await;
    }

    pub async fn check_day_change(&mut self) {
        let now = Local::now().date_naive();
        if now != self.today {
            self.today = now;
            self.screen = Screen::Quote;
            self.selected_index = 0;
            self.load_day().await;
        }
    }

    async fn refresh_stats(&mut self) {
        let repo = &self.repository;
        let user_id = self.user.id.as_str();
        self.streak = repo.current_streak(user_id, self.today).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to compute streak: {}", e);
            0
        });
        self.viewed_count = repo.count_viewed_quotes(user_id).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to count viewed quotes: {}", e);
            0
        });
    }

    pub fn list_len(&self) -> usize {
        match self.screen {
            Screen::Routine => self.checklist.len(),
            Screen::Mood => Mood::ALL.len(),
            Screen::Favorites => self.favorites.len(),
            Screen::Manage => self.routines.len(),
            Screen::History => self.history.len(),
            Screen::Quote | Screen::Complete => 0,
        }
    }

    pub fn checklist_progress(&self) -> (usize, usize) {
        routines::progress(&self.checklist)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        self.status_message = None;

        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.list_len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::Next => match self.screen {
                Screen::Mood => {
                    if let Some(mood) = Mood::ALL.get(self.selected_index).copied() {
                        self.select_mood(mood).await;
                    }
                }
                Screen::Quote | Screen::Routine => {
                    let next = self.screen.next();
                    self.go_to(next).await;
                }
                _ => {}
            },

            AppAction::Back => {
                if self.screen.is_side() {
                    let back = self.return_screen;
                    self.go_to(back).await;
                } else {
                    let previous = self.screen.previous();
                    self.go_to(previous).await;
                }
            }

            AppAction::CheckRoutine => self.toggle_routine_status(RoutineStatus::Checked).await,

            AppAction::SkipRoutine => self.toggle_routine_status(RoutineStatus::Skipped).await,

            AppAction::SelectMood(mood) => self.select_mood(mood).await,

            AppAction::ToggleFavorite => self.toggle_favorite().await,

            AppAction::ShowFavorites => self.open_side(Screen::Favorites).await,

            AppAction::ShowHistory => self.open_side(Screen::History).await,

            AppAction::ShowManage => self.open_side(Screen::Manage).await,

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
                if self.tutorial_pending {
                    self.tutorial_pending = false;
                    if let Err(e) = self.repository.set_tutorial_completed().await {
                        tracing::warn!("Failed to save tutorial flag: {}", e);
                    }
                }
            }

            AppAction::DismissCelebration => {
                self.celebrating = false;
            }

            AppAction::AddRoutine => {
                if self.screen == Screen::Manage {
                    self.routine_input_active = true;
                    self.routine_input.clear();
                }
            }

            AppAction::DeleteRoutine => self.delete_selected_routine().await,

            AppAction::MoveRoutineUp => self.move_selected_routine(true).await,

            AppAction::MoveRoutineDown => self.move_selected_routine(false).await,

            AppAction::ToggleRoutineActive => self.toggle_selected_routine_active().await,

            AppAction::RoutineInputChar(c) => {
                self.routine_input.push(c);
            }

            AppAction::RoutineInputBackspace => {
                self.routine_input.pop();
            }

            AppAction::RoutineInputConfirm => {
                let title = std::mem::take(&mut self.routine_input);
                self.routine_input_active = false;
                let result = self.repository.create_routine(&self.user.id, &title).await;
                match result {
                    Ok(routine) => {
                        tracing::info!("Added routine {:?}", routine.title);
                        self.reload_routines().await;
                        self.selected_index = self.routines.len().saturating_sub(1);
                    }
                    Err(e) => self.report("Could not add routine", e),
                }
            }

            AppAction::RoutineInputCancel => {
                self.routine_input_active = false;
                self.routine_input.clear();
            }
        }

        Ok(false)
    }

    async fn go_to(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        self.screen = screen;
        self.selected_index = match screen {
            Screen::Mood => self
                .mood
                .and_then(|m| Mood::ALL.iter().position(|x| *x == m))
                .unwrap_or(0),
            _ => 0,
        };

        match screen {
            Screen::Routine => {
                self.checklist =
                    routines::todays_checklist(&self.repository, &self.user.id, self.today).await;
            }
            Screen::Complete => self.complete_morning().await,
            _ => {}
        }
    }

    async fn open_side(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        if !self.screen.is_side() {
            self.return_screen = self.screen;
        }

        match screen {
            Screen::Favorites => {
                self.favorites = quotes::favorite_quotes(&self.repository, &self.user.id).await;
            }
            Screen::History => self.load_history().await,
            Screen::Manage => self.reload_routines().await,
            _ => {}
        }

        self.screen = screen;
        self.selected_index = 0;
    }

    async fn complete_morning(&mut self) {
        self.refresh_stats().await;
        if quotes::check_quote_milestone(&self.repository, &self.user.id).await {
            tracing::info!("Quote milestone reached for {}", self.user.id);
            self.celebrating = true;
        }
    }

    async fn toggle_routine_status(&mut self, status: RoutineStatus) {
        if self.screen != Screen::Routine {
            return;
        }
        let Some(item) = self.checklist.get(self.selected_index) else {
            return;
        };

        let new_status = if item.status == Some(status) {
            None
        } else {
            Some(status)
        };
        let routine = item.routine.clone();

        if routines::set_routine_status(&self.repository, &routine, self.today, new_status).await {
            if let Some(item) = self.checklist.get_mut(self.selected_index) {
                item.status = new_status;
            }
            // Move on to the next open step after checking one off
            if new_status.is_some() {
                if let Some(next) = self
                    .checklist
                    .iter()
                    .enumerate()
                    .skip(self.selected_index + 1)
                    .find(|(_, i)| !i.is_done())
                    .map(|(idx, _)| idx)
                {
                    self.selected_index = next;
                }
            }
        } else {
            self.status_message = Some("Could not save routine".to_string());
        }
    }

    async fn select_mood(&mut self, mood: Mood) {
        if self.screen != Screen::Mood {
            return;
        }
        let quote_id = (!self.quote.is_fallback()).then_some(self.quote.id.as_str());
        let result = self
            .repository
            .upsert_mood_log(&self.user.id, self.today, mood, quote_id)
            .await;
        match result {
            Ok(_) => {
                self.mood = Some(mood);
                self.go_to(Screen::Complete).await;
            }
            Err(e) => self.report("Could not save mood", e),
        }
    }

    async fn toggle_favorite(&mut self) {
        let quote_id = match self.screen {
            Screen::Favorites => match self.favorites.get(self.selected_index) {
                Some(q) => q.id.clone(),
                None => return,
            },
            _ if self.quote.is_fallback() => return,
            _ => self.quote.id.clone(),
        };

        let result = self
            .repository
            .toggle_favorite_quote(&self.user.id, &quote_id)
            .await;
        match result {
            Ok(now_favorite) => {
                if quote_id == self.quote.id {
                    self.is_favorite = now_favorite;
                }
                if self.screen == Screen::Favorites {
                    self.favorites.retain(|q| q.id != quote_id);
                    let len = self.favorites.len();
                    if len > 0 && self.selected_index >= len {
                        self.selected_index = len - 1;
                    }
                }
            }
            Err(e) => self.report("Could not update favorite", e),
        }
    }

    async fn load_history(&mut self) {
        let from = self.today - Duration::days(HISTORY_DAYS - 1);
        let repo = &self.repository;
        let user_id = self.user.id.as_str();

        self.history = repo
            .get_completion_history(user_id, from, self.today)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to load history: {}", e);
                Vec::new()
            });
        self.history.reverse();
        self.mood_history = repo
            .get_mood_logs_in_range(user_id, from, self.today)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to load mood history: {}", e);
                Vec::new()
            });
        self.refresh_stats().await;
    }

    pub fn mood_on(&self, date: NaiveDate) -> Option<Mood> {
        self.mood_history
            .iter()
            .find(|m| m.log_date == date)
            .map(|m| m.mood)
    }

    async fn reload_routines(&mut self) {
        self.routines = self
            .repository
            .get_routines_by_user(&self.user.id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to load routines: {}", e);
                Vec::new()
            });
        self.checklist = routines::todays_checklist(&self.repository, &self.user.id, self.today).await;
    }

    pub fn selected_routine(&self) -> Option<&Routine> {
        if self.screen != Screen::Manage {
            return None;
        }
        self.routines.get(self.selected_index)
    }

    async fn delete_selected_routine(&mut self) {
        let Some(routine) = self.selected_routine() else {
            return;
        };
        let id = routine.id.clone();

        let result = self.repository.delete_routine(&id).await;
        match result {
            Ok(()) => {
                self.reload_routines().await;
                let len = self.routines.len();
                if len > 0 && self.selected_index >= len {
                    self.selected_index = len - 1;
                }
            }
            Err(e) => self.report("Could not delete routine", e),
        }
    }

    async fn move_selected_routine(&mut self, up: bool) {
        if self.selected_routine().is_none() {
            return;
        }
        if let Some(target) = routines::move_routine(
            &self.repository,
            &self.user.id,
            &self.routines,
            self.selected_index,
            up,
        )
        .await
        {
            self.reload_routines().await;
            self.selected_index = target;
        }
    }

    async fn toggle_selected_routine_active(&mut self) {
        let Some(routine) = self.selected_routine() else {
            return;
        };
        let (id, active) = (routine.id.clone(), routine.is_active);

        let result = self.repository.set_routine_active(&id, !active).await;
        match result {
            Ok(()) => self.reload_routines().await,
            Err(e) => self.report("Could not update routine", e),
        }
    }

    fn report(&mut self, context: &str, err: AppError) {
        tracing::error!("{}: {}", context, err);
        self.status_message = Some(match err {
            AppError::InvalidInput(msg) => format!("{}: {}", context, msg),
            _ => context.to_string(),
        });
    }
}
