//! UI languages and string table

use serde::{Deserialize, Serialize};

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
    Es,
    Fr,
    Zh,
    Ru,
    Hi,
    De,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::En,
        Language::He,
        Language::Es,
        Language::Fr,
        Language::Zh,
        Language::Ru,
        Language::Hi,
        Language::De,
    ];

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Zh => "zh",
            Language::Ru => "ru",
            Language::Hi => "hi",
            Language::De => "de",
        }
    }

    /// Parse a language code, tolerating region suffixes (`fr-CA`)
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next()?.to_lowercase();
        Self::ALL.into_iter().find(|l| l.code() == primary)
    }

    /// Name of the language in itself, for the language picker
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::He => "עברית",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::Zh => "中文",
            Language::Ru => "Русский",
            Language::Hi => "हिन्दी",
            Language::De => "Deutsch",
        }
    }

    /// Right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::He)
    }
}

/// Translatable UI strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    StartButton,
    Order,
    Serve,
    Success,
    Error,
    SpeedBonus,
    FastBonus,
    Paused,
    Resume,
    OutOfTime,
    TryAgain,
    SummoningPrize,
    LevelComplete,
    NextOrder,
}

/// Look up a UI string
pub fn tr(lang: Language, text: Text) -> &'static str {
    use Language::*;
    use Text::*;
    match (text, lang) {
        (Title, _) => "Donut Dash",

        (StartButton, En) => "Start Baking",
        (StartButton, He) => "מתחילים לאפות",
        (StartButton, Es) => "Empezar a hornear",
        (StartButton, Fr) => "Commencer",
        (StartButton, Zh) => "开始烘焙",
        (StartButton, Ru) => "Начать выпечку",
        (StartButton, Hi) => "बेकिंग शुरू करें",
        (StartButton, De) => "Backen starten",

        (Order, En) => "Order",
        (Order, He) => "הזמנה",
        (Order, Es) => "Pedido",
        (Order, Fr) => "Commande",
        (Order, Zh) => "订单",
        (Order, Ru) => "Заказ",
        (Order, Hi) => "ऑर्डर",
        (Order, De) => "Bestellung",

        (Serve, En) => "SERVE",
        (Serve, He) => "הגש",
        (Serve, Es) => "SERVIR",
        (Serve, Fr) => "SERVIR",
        (Serve, Zh) => "上菜",
        (Serve, Ru) => "ПОДАТЬ",
        (Serve, Hi) => "परोसें",
        (Serve, De) => "SERVIEREN",

        (Success, En) => "TASTY!",
        (Success, He) => "טעים!",
        (Success, Es) => "¡RICO!",
        (Success, Fr) => "DÉLICIEUX !",
        (Success, Zh) => "好吃！",
        (Success, Ru) => "ВКУСНО!",
        (Success, Hi) => "स्वादिष्ट!",
        (Success, De) => "LECKER!",

        (Error, En) => "OOPS!",
        (Error, He) => "אופס!",
        (Error, Es) => "¡UY!",
        (Error, Fr) => "OUPS !",
        (Error, Zh) => "哎呀！",
        (Error, Ru) => "УПС!",
        (Error, Hi) => "ओह!",
        (Error, De) => "HOPPLA!",

        (SpeedBonus, En) => "SPEED BONUS! +5s",
        (SpeedBonus, He) => "בונוס מהירות! +5ש",
        (SpeedBonus, Es) => "¡BONO DE VELOCIDAD! +5s",
        (SpeedBonus, Fr) => "BONUS VITESSE ! +5s",
        (SpeedBonus, Zh) => "速度奖励！+5秒",
        (SpeedBonus, Ru) => "БОНУС СКОРОСТИ! +5с",
        (SpeedBonus, Hi) => "स्पीड बोनस! +5s",
        (SpeedBonus, De) => "TEMPOBONUS! +5s",

        (FastBonus, En) => "FAST! +2s",
        (FastBonus, He) => "מהיר! +2ש",
        (FastBonus, Es) => "¡RÁPIDO! +2s",
        (FastBonus, Fr) => "RAPIDE ! +2s",
        (FastBonus, Zh) => "真快！+2秒",
        (FastBonus, Ru) => "БЫСТРО! +2с",
        (FastBonus, Hi) => "तेज़! +2s",
        (FastBonus, De) => "SCHNELL! +2s",

        (Paused, En) => "PAUSED",
        (Paused, He) => "מושהה",
        (Paused, Es) => "PAUSA",
        (Paused, Fr) => "PAUSE",
        (Paused, Zh) => "已暂停",
        (Paused, Ru) => "ПАУЗА",
        (Paused, Hi) => "रुका हुआ",
        (Paused, De) => "PAUSE",

        (Resume, En) => "RESUME",
        (Resume, He) => "המשך",
        (Resume, Es) => "CONTINUAR",
        (Resume, Fr) => "REPRENDRE",
        (Resume, Zh) => "继续",
        (Resume, Ru) => "ПРОДОЛЖИТЬ",
        (Resume, Hi) => "जारी रखें",
        (Resume, De) => "WEITER",

        (OutOfTime, En) => "Out of Time!",
        (OutOfTime, He) => "נגמר הזמן!",
        (OutOfTime, Es) => "¡Se acabó el tiempo!",
        (OutOfTime, Fr) => "Temps écoulé !",
        (OutOfTime, Zh) => "时间到！",
        (OutOfTime, Ru) => "Время вышло!",
        (OutOfTime, Hi) => "समय समाप्त!",
        (OutOfTime, De) => "Zeit abgelaufen!",

        (TryAgain, En) => "Try Again",
        (TryAgain, He) => "נסו שוב",
        (TryAgain, Es) => "Intentar de nuevo",
        (TryAgain, Fr) => "Réessayer",
        (TryAgain, Zh) => "再试一次",
        (TryAgain, Ru) => "Ещё раз",
        (TryAgain, Hi) => "फिर से कोशिश करें",
        (TryAgain, De) => "Nochmal",

        (SummoningPrize, En) => "Summoning Prize...",
        (SummoningPrize, He) => "מזמנים פרס...",
        (SummoningPrize, Es) => "Invocando premio...",
        (SummoningPrize, Fr) => "Invocation du prix...",
        (SummoningPrize, Zh) => "正在召唤奖品...",
        (SummoningPrize, Ru) => "Призываем приз...",
        (SummoningPrize, Hi) => "इनाम बुलाया जा रहा है...",
        (SummoningPrize, De) => "Preis wird beschworen...",

        (LevelComplete, En) => "Level Complete!",
        (LevelComplete, He) => "השלב הושלם!",
        (LevelComplete, Es) => "¡Nivel completado!",
        (LevelComplete, Fr) => "Niveau terminé !",
        (LevelComplete, Zh) => "关卡完成！",
        (LevelComplete, Ru) => "Уровень пройден!",
        (LevelComplete, Hi) => "स्तर पूरा!",
        (LevelComplete, De) => "Level geschafft!",

        (NextOrder, En) => "Next Order",
        (NextOrder, He) => "ההזמנה הבאה",
        (NextOrder, Es) => "Siguiente pedido",
        (NextOrder, Fr) => "Commande suivante",
        (NextOrder, Zh) => "下一单",
        (NextOrder, Ru) => "Следующий заказ",
        (NextOrder, Hi) => "अगला ऑर्डर",
        (NextOrder, De) => "Nächste Bestellung",
    }
}
