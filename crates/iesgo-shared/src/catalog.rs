//! Seed profiles shown in the discovery feed.
//!
//! The catalog is a static fixture: candidates are data, not live agents.

use crate::constants::LOCAL_USER_ID;
use crate::types::{Gender, Intention, Shift, User, UserId, UserRole};

/// Read-only collection of candidate profiles, in feed order.
#[derive(Debug, Clone)]
pub struct Catalog {
    users: Vec<User>,
}

impl Catalog {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The built-in campus profiles.
    pub fn seed() -> Self {
        Self::new(seed_users())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Like [`Catalog::get`] but falls back to a placeholder profile.
    pub fn get_or_placeholder(&self, id: &UserId) -> User {
        self.get(id).cloned().unwrap_or_else(unknown_profile)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

/// Profile installed by `login`, with the supplied email.
pub fn default_profile(email: &str) -> User {
    User {
        id: UserId::new(LOCAL_USER_ID),
        email: email.to_string(),
        name: "Você".into(),
        age: 22,
        course: Some("Administração".into()),
        semester: Some(3),
        role: UserRole::Student,
        bio: "Estudante da IESGO procurando novas amizades e quem sabe algo mais.".into(),
        photos: vec![photo(99)],
        interests: tags(&["Empreendedorismo", "Festas", "Networking"]),
        gender: Gender::Male,
        verified: false,
        shift: Shift::Noturno,
        intention: Intention::Match,
    }
}

/// Stand-in for a match partner that is no longer in the catalog.
pub fn unknown_profile() -> User {
    User {
        id: UserId::new("unknown"),
        email: String::new(),
        name: "Usuário Desconhecido".into(),
        age: 0,
        course: Some("N/A".into()),
        semester: None,
        role: UserRole::Student,
        bio: String::new(),
        photos: vec!["https://picsum.photos/200".into()],
        interests: Vec::new(),
        gender: Gender::Other,
        verified: false,
        shift: Shift::Integral,
        intention: Intention::Match,
    }
}

fn photo(n: u32) -> String {
    format!("https://picsum.photos/400/600?random={n}")
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn student(
    id: &str,
    email: &str,
    name: &str,
    age: u32,
    course: &str,
    semester: u32,
    bio: &str,
    photos: &[u32],
    interests: &[&str],
    gender: Gender,
    verified: bool,
    shift: Shift,
    intention: Intention,
) -> User {
    User {
        id: UserId::new(id),
        email: email.into(),
        name: name.into(),
        age,
        course: Some(course.into()),
        semester: Some(semester),
        role: UserRole::Student,
        bio: bio.into(),
        photos: photos.iter().copied().map(photo).collect(),
        interests: tags(interests),
        gender,
        verified,
        shift,
        intention,
    }
}

fn seed_users() -> Vec<User> {
    vec![
        student(
            "user_2",
            "ana.silva@iesgo.edu.br",
            "Ana Silva",
            21,
            "Direito",
            4,
            "Futura advogada. OAB é o foco, mas o barzinho na sexta é sagrado. ⚖️🍷",
            &[1, 2],
            &["Direito Penal", "Atlética", "Vinho", "Barzinho pós-aula", "Netflix"],
            Gender::Female,
            true,
            Shift::Noturno,
            Intention::Match,
        ),
        student(
            "user_3",
            "marcos.oliveira@iesgo.edu.br",
            "Marcos Oliveira",
            23,
            "Agronomia",
            7,
            "Do campo pra cidade. Tereré, sertanejo e muita técnica. 🚜🌾",
            &[3, 4],
            &["Sertanejo", "Tereré", "Churrasco", "Pecuária", "Natureza"],
            Gender::Male,
            true,
            Shift::Matutino,
            Intention::Barzinho,
        ),
        student(
            "user_4",
            "julia.santos@gmail.com",
            "Júlia Santos",
            20,
            "Biomedicina",
            2,
            "Caloura sofrendo com lista de material. Alguém pra dividir o prejuízo? 🦷✨",
            &[5],
            &["Festas", "Viagem", "Estética", "Instagram", "Trote Solidário"],
            Gender::Female,
            false,
            Shift::Integral,
            Intention::StudyDate,
        ),
        student(
            "user_5",
            "lucas.pereira@iesgo.edu.br",
            "Lucas Pereira",
            25,
            "Medicina Veterinária",
            9,
            "Quase formando. Se seu cachorro late, a gente já se entende. 🐶🩺",
            &[6],
            &["Pets", "Cirurgia Vet", "Cavalos", "Futebol", "Cerveja"],
            Gender::Male,
            true,
            Shift::Integral,
            Intention::Match,
        ),
        student(
            "user_6",
            "fernanda.costa@iesgo.edu.br",
            "Fernanda Costa",
            22,
            "Psicologia",
            5,
            "Freud explica, mas eu prefiro um café. Buscando conexões reais. 🧠☕",
            &[7],
            &["Leitura", "Psicanálise", "Café", "Indie", "Museus"],
            Gender::Female,
            true,
            Shift::Noturno,
            Intention::StudyDate,
        ),
        student(
            "user_7",
            "rodrigo.mendes@iesgo.edu.br",
            "Rodrigo Mendes",
            24,
            "Bacharelado em Sistema de Informação",
            8,
            "Calculadora na mão e capacete na cabeça. Bora construir algo juntos? 🏗️",
            &[8],
            &["Academia", "Obras", "Games", "Churrasco", "Rock"],
            Gender::Male,
            false,
            Shift::Noturno,
            Intention::Barzinho,
        ),
    ]
}
