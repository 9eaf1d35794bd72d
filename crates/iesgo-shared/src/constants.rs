/// Application name
pub const APP_NAME: &str = "IESGO Connect";

/// Storage keys, one independent entry per entity
pub const KEY_USER: &str = "iesgo_user";
pub const KEY_MATCHES: &str = "iesgo_matches";
pub const KEY_MESSAGES: &str = "iesgo_messages";
pub const KEY_SWIPES: &str = "iesgo_swipes";
pub const KEY_THEME: &str = "theme";

/// Every key this application writes.
pub const APP_KEYS: [&str; 5] = [KEY_USER, KEY_MATCHES, KEY_MESSAGES, KEY_SWIPES, KEY_THEME];

/// Id of the profile created by `login`. Only this identity gets scripted replies.
pub const LOCAL_USER_ID: &str = "me";

/// Sender id used for the simulated chat partner
pub const COUNTERPART_ID: &str = "other";

/// Probability that a like/study swipe produces a match
pub const DEFAULT_MATCH_PROBABILITY: f64 = 0.6;

/// Simulated authentication round trip
pub const LOGIN_DELAY_MS: u64 = 800;

/// Delay before the Study Date opener is sent
pub const STUDY_OPENER_DELAY_MS: u64 = 500;

/// Delay before the simulated partner replies
pub const AUTO_REPLY_DELAY_MS: u64 = 3000;

pub const STUDY_OPENER_TEXT: &str =
    "Oi! Vi que você topa um Study Date. Vamos marcar na biblioteca?";
pub const AUTO_REPLY_TEXT: &str = "Opa! Claro, adoraria.";

/// Official IESGO (Formosa-GO) courses
pub const COURSES: [&str; 12] = [
    "Administração",
    "Agronomia",
    "Bacharelado em Sistema de Informação",
    "Biomedicina",
    "Ciências Contábeis",
    "Direito",
    "Enfermagem",
    "Farmácia",
    "Fisioterapia",
    "Medicina Veterinária",
    "Pedagogia",
    "Psicologia",
];

pub const INTERESTS: [&str; 25] = [
    // campus life
    "Barzinho pós-aula",
    "Atlética",
    "Jogos Universitários",
    "Semana Acadêmica",
    "Estágio",
    "Iniciação Científica",
    "Monitoria",
    "Horas Complementares",
    "Trote Solidário",
    "Xerox",
    "Cantina",
    "Biblioteca",
    // lifestyle
    "Academia",
    "Netflix",
    "Viagem",
    "Pets",
    "Festa",
    "Games",
    "Música Sertaneja",
    "Rock",
    "Pagode",
    "Cerveja",
    "Tereré",
    "Café",
    "Natureza",
];
