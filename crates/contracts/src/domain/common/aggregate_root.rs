use super::{AggregateId, EntityMetadata};

/// Трейт для корня агрегата
///
/// Определяет обязательные методы и метаданные для всех агрегатов системы
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id: AggregateId;

    // ============================================================================
    // Методы экземпляра (данные конкретной записи)
    // ============================================================================

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Получить метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Получить изменяемые метаданные
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    // ============================================================================
    // Метаданные класса агрегата (статические данные)
    // ============================================================================

    /// Индекс агрегата в системе (например, "a002")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "crop_fields")
    fn collection_name() -> &'static str;

    /// Имя элемента для логов и сообщений (например, "Crop field")
    fn element_name() -> &'static str;

    // ============================================================================
    // Методы с реализацией по умолчанию
    // ============================================================================

    /// Полное имя агрегата, оно же имя таблицы (например, "a002_crop_fields")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Хук перед записью изменений существующего агрегата
    fn before_write(&mut self) {
        self.metadata_mut().touch();
    }
}

/// A validated mutation plus the version the client last saw, if it sent one.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub expected_version: Option<i32>,
}

impl<T> Versioned<T> {
    pub fn new(data: T, expected_version: Option<i32>) -> Self {
        Self {
            data,
            expected_version,
        }
    }

    /// Mutation without a client-side version check
    pub fn unchecked(data: T) -> Self {
        Self::new(data, None)
    }
}
