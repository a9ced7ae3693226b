//! Explicit provider registry.
//!
//! Providers are registered up front under a string id; units declare which
//! ids they provide and the launcher instantiates them from here.

use std::fmt;

type Factory<T> = Box<dyn Fn() -> Box<T>>;

/// Ordered map of provider id to factory.
pub struct ProviderRegistry<T: ?Sized> {
  providers: Vec<(String, Factory<T>)>,
}

impl<T: ?Sized> Default for ProviderRegistry<T> {
  fn default() -> Self {
    Self { providers: Vec::new() }
  }
}

impl<T: ?Sized> ProviderRegistry<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `factory` under `id`, replacing any earlier registration.
  pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
  where
    F: Fn() -> Box<T> + 'static,
  {
    let id = id.into();
    let factory: Factory<T> = Box::new(factory);
    match self.providers.iter_mut().find(|(existing, _)| *existing == id) {
      Some(slot) => slot.1 = factory,
      None => self.providers.push((id, factory)),
    }
    self
  }

  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.providers.iter().map(|(id, _)| id.as_str())
  }

  pub fn contains(&self, id: &str) -> bool {
    self.providers.iter().any(|(existing, _)| existing == id)
  }

  /// Instantiate the provider registered under `id`.
  pub fn create(&self, id: &str) -> Option<Box<T>> {
    self
      .providers
      .iter()
      .find(|(existing, _)| existing == id)
      .map(|(_, factory)| factory())
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }
}

impl<T: ?Sized> fmt::Debug for ProviderRegistry<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.ids()).finish()
  }
}
