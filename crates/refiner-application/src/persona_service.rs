//! Persona collection and the current selection.

use refiner_core::error::{RefinerError, Result};
use refiner_core::persona::{CreatePersonaRequest, Persona};
use refiner_core::store::{CollectionItem, CollectionStore, bound_newest_first};
use std::sync::Arc;
use tokio::sync::RwLock;

struct PersonaState {
    personas: Vec<Persona>,
    selected_id: Option<String>,
}

impl PersonaState {
    /// Drops a selection that no longer refers to a stored persona.
    fn repair_selection(&mut self) {
        if let Some(id) = &self.selected_id {
            if !self.personas.iter().any(|persona| &persona.id == id) {
                tracing::debug!(persona_id = %id, "Clearing selection of removed persona");
                self.selected_id = None;
            }
        }
    }
}

/// Manages personas and which one, if any, is applied to requests.
///
/// The selection always refers to an existing persona. Changes reach memory
/// only after the store accepted them.
pub struct PersonaService {
    store: Arc<dyn CollectionStore<Persona>>,
    state: RwLock<PersonaState>,
    capacity: usize,
}

impl PersonaService {
    /// Loads the stored personas once. Nothing is selected initially.
    pub async fn load(store: Arc<dyn CollectionStore<Persona>>, capacity: usize) -> Result<Self> {
        let mut personas = store.load().await?;
        bound_newest_first(&mut personas, capacity);
        tracing::debug!(count = personas.len(), capacity, "Loaded personas");
        Ok(Self {
            store,
            state: RwLock::new(PersonaState {
                personas,
                selected_id: None,
            }),
            capacity,
        })
    }

    /// Validates and stores a new persona.
    pub async fn create(&self, request: CreatePersonaRequest) -> Result<Persona> {
        request.validate()?;
        let persona = request.into_persona();

        let mut state = self.state.write().await;
        let mut personas = Vec::with_capacity(state.personas.len() + 1);
        personas.push(persona.clone());
        personas.extend(state.personas.iter().cloned());
        bound_newest_first(&mut personas, self.capacity);
        self.store.save_all(&personas).await?;

        state.personas = personas;
        state.repair_selection();

        tracing::info!(persona_id = %persona.id, name = %persona.name, "Created persona");
        Ok(persona)
    }

    /// Deletes a persona, clearing the selection if it was selected.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let index = state
            .personas
            .iter()
            .position(|persona| persona.id == id)
            .ok_or_else(|| RefinerError::not_found(Persona::ENTITY_NAME, id))?;

        let mut personas = state.personas.clone();
        personas.remove(index);
        self.store.save_all(&personas).await?;

        state.personas = personas;
        state.repair_selection();

        tracing::info!(persona_id = %id, "Deleted persona");
        Ok(())
    }

    /// Selects a persona by id, or clears the selection with `None`.
    pub async fn select(&self, id: Option<&str>) -> Result<()> {
        let mut state = self.state.write().await;
        match id {
            Some(id) => {
                if !state.personas.iter().any(|persona| persona.id == id) {
                    return Err(RefinerError::not_found(Persona::ENTITY_NAME, id));
                }
                state.selected_id = Some(id.to_string());
            }
            None => state.selected_id = None,
        }
        Ok(())
    }

    pub async fn selected_id(&self) -> Option<String> {
        self.state.read().await.selected_id.clone()
    }

    pub async fn selected(&self) -> Option<Persona> {
        let state = self.state.read().await;
        let id = state.selected_id.as_deref()?;
        state.personas.iter().find(|persona| persona.id == id).cloned()
    }

    /// Instructions of the selected persona, examples included.
    pub async fn selected_instructions(&self) -> Option<String> {
        self.selected()
            .await
            .map(|persona| persona.prompt_instructions())
    }

    /// All personas, newest first.
    pub async fn list(&self) -> Vec<Persona> {
        self.state.read().await.personas.clone()
    }

    pub async fn find(&self, id: &str) -> Result<Persona> {
        self.state
            .read()
            .await
            .personas
            .iter()
            .find(|persona| persona.id == id)
            .cloned()
            .ok_or_else(|| RefinerError::not_found(Persona::ENTITY_NAME, id))
    }
}
