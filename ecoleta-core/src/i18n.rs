/// UI language. Portuguese is the form's native language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    Pt,
    En,
}

impl Lang {
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_lowercase().starts_with("en") {
            Lang::En
        } else {
            Lang::Pt
        }
    }
}

/// Every user-facing string the form shows outside the host page markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    PointCreated,
    SelectRegion,
    SelectSubRegion,
    Loading,
    LoadFailed,
    Retry,
    Submit,
    Submitting,
    SubmitFailed,
    MissingFields,
    LocationDenied,
    LocationUnavailable,
}

pub fn text(lang: Lang, msg: Msg) -> &'static str {
    match (lang, msg) {
        (Lang::Pt, Msg::PointCreated) => "Ponto de coleta cadastrado!",
        (Lang::En, Msg::PointCreated) => "Collection point registered!",
        (Lang::Pt, Msg::SelectRegion) => "Selecione uma UF",
        (Lang::En, Msg::SelectRegion) => "Select a state",
        (Lang::Pt, Msg::SelectSubRegion) => "Selecione uma cidade",
        (Lang::En, Msg::SelectSubRegion) => "Select a city",
        (Lang::Pt, Msg::Loading) => "Carregando…",
        (Lang::En, Msg::Loading) => "Loading…",
        (Lang::Pt, Msg::LoadFailed) => "Falha ao carregar.",
        (Lang::En, Msg::LoadFailed) => "Failed to load.",
        (Lang::Pt, Msg::Retry) => "Tentar novamente",
        (Lang::En, Msg::Retry) => "Retry",
        (Lang::Pt, Msg::Submit) => "Cadastrar ponto de coleta",
        (Lang::En, Msg::Submit) => "Register collection point",
        (Lang::Pt, Msg::Submitting) => "Enviando…",
        (Lang::En, Msg::Submitting) => "Sending…",
        (Lang::Pt, Msg::SubmitFailed) => "Não foi possível cadastrar o ponto.",
        (Lang::En, Msg::SubmitFailed) => "Could not register the point.",
        (Lang::Pt, Msg::MissingFields) => "Preencha os campos obrigatórios:",
        (Lang::En, Msg::MissingFields) => "Fill in the required fields:",
        (Lang::Pt, Msg::LocationDenied) => "Localização negada; centralizando em (0, 0).",
        (Lang::En, Msg::LocationDenied) => "Location denied; centering at (0, 0).",
        (Lang::Pt, Msg::LocationUnavailable) => "Localização indisponível.",
        (Lang::En, Msg::LocationUnavailable) => "Location unavailable.",
    }
}
