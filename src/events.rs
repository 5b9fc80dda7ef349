//! События генерации
//!
//! Библиотека сама ничего не печатает: вместо консольного вывода стадии
//! публикуют структурированные события, а подписчик (CLI, тесты) решает,
//! что с ними делать.

/// Причина, по которой котловина не стала озером
///
/// Это штатные отрицательные исходы, а не ошибки: конвейер всегда доходит
/// до конца с тем набором озёр, который получился.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Котловина соприкасается с клеткой ниже уровня моря — вода уйдёт в океан
    DrainsToOcean,
    /// Не нашлось кромки строго выше дна (обход упёрся в предел поиска)
    NoRim,
    /// Точка перелива слишком близко ко дну — это ямка, а не озеро
    TooShallow,
    /// Заполнение дало меньше клеток, чем минимальный размер озера
    TooSmall,
    /// Заполнение вышло за максимальный размер озера
    TooLarge,
}

/// Событие одной стадии генерации
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Карта высот готова
    HeightmapReady { land_cells: usize, total_cells: usize },
    /// Найдены кандидаты на дно озёр
    SeedsFound { count: usize },
    /// Озеро принято
    LakeAccepted {
        id: u32,
        seed: usize,
        tiles: usize,
        level: u8,
        has_spillway: bool,
    },
    /// Котловина отброшена
    BasinRejected { seed: usize, reason: RejectReason },
}

/// Приёмник событий генерации
pub trait EventSink {
    fn publish(&mut self, event: GenerationEvent);
}

/// Заглушка: события игнорируются
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: GenerationEvent) {}
}

/// Копилка событий для тестов и отладки
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<GenerationEvent>,
}

impl EventSink for CollectSink {
    fn publish(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_sink_stores_events() {
        let mut sink = CollectSink::default();
        sink.publish(GenerationEvent::SeedsFound { count: 3 });
        sink.publish(GenerationEvent::BasinRejected {
            seed: 17,
            reason: RejectReason::TooSmall,
        });
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(
            sink.events[1],
            GenerationEvent::BasinRejected {
                reason: RejectReason::TooSmall,
                ..
            }
        ));
    }
}
