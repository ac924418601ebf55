use super::controller::{
    FieldDecoration, FieldKey, FormController, FormError, FormResult, write_lock,
};
use super::validation::{FieldLens, FormModel, ValidationResult};

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
        }
        self.decorate(key, FieldDecoration::Clear)
    }

    pub fn set_by_key(&self, field_name: &str, value: impl Into<String>) -> FormResult<FieldKey> {
        let key = T::key_for(field_name)
            .ok_or_else(|| FormError::UnknownField(field_name.to_string()))?;
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            state.model.set_value(key, value.into());
        }
        self.decorate(key, FieldDecoration::Clear)?;
        Ok(key)
    }

    pub async fn input(
        &self,
        field_name: &str,
        value: impl Into<String>,
    ) -> FormResult<Option<ValidationResult>> {
        let key = self.set_by_key(field_name, value)?;
        let debouncer = self.debouncer(key)?;
        match debouncer.run(|| self.validate_current(key)).await {
            Some(result) => result,
            None => {
                tracing::debug!(field = %key, "debounced validation superseded");
                Ok(None)
            }
        }
    }

    pub fn blur(&self, field_name: &str) -> FormResult<Option<ValidationResult>> {
        let key = T::key_for(field_name)
            .ok_or_else(|| FormError::UnknownField(field_name.to_string()))?;
        self.debouncer(key)?.cancel();
        self.validate_current(key)
    }
}
