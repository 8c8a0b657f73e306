use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Инициализирует логгер библиотеки.
///
/// Хост может настроить вывод через переменную окружения RUST_LOG;
/// по умолчанию включены информационные сообщения subnova и
/// предупреждения остальных модулей.
pub fn init_logger() {
    // Установка базового фильтра и переопределение через переменные окружения
    let env = Env::default().filter_or("RUST_LOG", "warn,subnova=info,reqwest=warn");

    let mut builder = Builder::from_env(env);

    // Явно подавляем шумные логи HTTP стека
    builder
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("tokio_util", LevelFilter::Error)
        // Форматирование логов
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
