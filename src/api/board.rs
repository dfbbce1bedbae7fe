use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::ThemeContext;
use crate::error::{ChartError, ChartResult};

use super::surface::SurfaceProvider;
use super::view::ChartView;

/// Receives the new theme after every chart on a board has re-rendered.
pub trait ThemeObserver {
    fn id(&self) -> &str;
    fn theme_changed(&mut self, theme: &ThemeContext);
}

/// Named chart views sharing one theme.
///
/// Owns the current `ThemeContext` and the observer list that a theme switch
/// notifies, in registration order.
pub struct ChartBoard<P: SurfaceProvider> {
    theme: ThemeContext,
    charts: IndexMap<String, ChartView<P>>,
    observers: Vec<Box<dyn ThemeObserver>>,
}

impl<P: SurfaceProvider> ChartBoard<P> {
    #[must_use]
    pub fn new(theme: ThemeContext) -> Self {
        Self {
            theme,
            charts: IndexMap::new(),
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    /// Adds `view` under `name`, switching it to the board theme. Returns the
    /// view previously registered under that name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mut view: ChartView<P>,
    ) -> ChartResult<Option<ChartView<P>>> {
        let name = name.into();
        if name.is_empty() {
            return Err(ChartError::InvalidData(
                "chart name must not be empty".to_owned(),
            ));
        }
        if view.theme() != &self.theme {
            view.set_theme(self.theme.clone())?;
        }
        Ok(self.charts.insert(name, view))
    }

    pub fn remove(&mut self, name: &str) -> Option<ChartView<P>> {
        self.charts.shift_remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ChartView<P>> {
        self.charts.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChartView<P>> {
        self.charts.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn register_observer(&mut self, observer: Box<dyn ThemeObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.observers.iter().any(|entry| entry.id() == observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replaces the theme, re-renders every chart, then notifies observers.
    ///
    /// A chart that fails to redraw does not stop the others; the first
    /// failure is returned after all charts and observers were updated.
    pub fn set_theme(&mut self, theme: ThemeContext) -> ChartResult<()> {
        theme.validate()?;
        self.theme = theme;
        let mut first_error = None;
        for (name, view) in &mut self.charts {
            if let Err(err) = view.set_theme(self.theme.clone()) {
                warn!(chart = %name, error = %err, "chart failed to re-render after theme switch");
                first_error.get_or_insert(err);
            }
        }
        for observer in &mut self.observers {
            observer.theme_changed(&self.theme);
        }
        debug!(
            mode = ?self.theme.mode(),
            charts = self.charts.len(),
            observers = self.observers.len(),
            "board theme switched"
        );
        first_error.map_or(Ok(()), Err)
    }
}
