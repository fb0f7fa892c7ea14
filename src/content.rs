//! The static content of the prayer guide.
//!
//! The tree borrows its strings, so the compiled-in guide is a `'static` value that is never
//! rebuilt while other documents (tests, previews) can borrow owned text.

/// Slug used as the prefix of generated file names.
pub const FILE_SLUG: &str = "3-ancoras-guia";

/// A complete document: heading block, chapters and a closing blessing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Document<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub chapters: &'a [Chapter<'a>],
    pub closing: &'a str,
}

/// One anchor of the day: heading, scripture verse and its prayers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chapter<'a> {
    pub title: &'a str,
    pub verse: &'a str,
    pub prayers: &'a [Prayer<'a>],
}

/// A titled prayer or practice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prayer<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

static GUIDE: Document<'static> = Document {
    title: "A Regra das 3 Ancoras",
    subtitle: "Guia de Oracoes Diarias",
    chapters: &[
        Chapter {
            title: "Ancora da Manha (O Despertar na Graca)",
            verse: "\"Faze-me ouvir do teu amor leal pela manha, pois em ti confio.\" (Salmo 143, 8)",
            prayers: &[
                Prayer {
                    title: "Versao 2 Minutos - Oracao de Oferecimento",
                    text: "\"Senhor, no silencio deste dia que amanhece, eu Te entrego o meu cansaco, os meus medos e as minhas expectativas. Liberta-me da necessidade de ser perfeito hoje. Que eu caminhe amparado pela Tua graca, oferecendo o meu trabalho, a minha familia e as minhas fragilidades ao Teu cuidado amoroso. Amem.\"",
                },
                Prayer {
                    title: "Versao 7 Minutos",
                    text: "1. Faca a Oracao de Oferecimento\n2. Leia lentamente o Salmo 23\n3. Termine com 1 minuto de silencio absoluto",
                },
            ],
        },
        Chapter {
            title: "Ancora do Meio-Dia (A Pausa do Descanso)",
            verse: "\"Orem continuamente. Deem gracas em todas as circunstancias.\" (1 Tessalonicenses 5, 17-18)",
            prayers: &[
                Prayer {
                    title: "Versao 1 Minuto - A Jaculatoria de Alivio",
                    text: "\"Jesus, manso e humilde de coracao, fazei o meu coracao semelhante ao Vosso. Que no meio da agitacao e do barulho destas horas, eu encontre descanso imediato na Tua graca.\"",
                },
                Prayer {
                    title: "Versao 5 Minutos",
                    text: "1. Reza a Jaculatoria\n2. Leia um versiculo do Evangelho do Dia\n3. Se a manha foi dificil, nao se condene",
                },
            ],
        },
        Chapter {
            title: "Ancora da Noite (O Pouso Seguro)",
            verse: "\"Gracas ao grande amor do Senhor e que nao somos consumidos.\" (Lamentacoes 3, 22-23)",
            prayers: &[
                Prayer {
                    title: "Versao 2 Minutos - Ato de Contricao Curativo",
                    text: "\"Meu Deus, eu Te agradeco por ter me sustentado ate aqui. Peco perdao com o coracao tranquilo pelas vezes em que tropecei, perdi a paciencia ou duvidei do Teu cuidado hoje. Eu nao me escondo na culpa; eu me lanco agora na Tua infinita misericordia, sabendo que o Teu perdao me abraca. Amem.\"",
                },
                Prayer {
                    title: "Versao 7 Minutos - Exame de Consciencia Gentil",
                    text: "Refleta sem peso sobre estas 3 perguntas:\n\n1. Onde eu percebi um pequeno cuidado de Deus por mim hoje?\n2. Em qual momento do dia eu deixei a ansiedade roubar minha paz?\n3. Como posso recomecar amanha de forma mais leve?",
                },
            ],
        },
    ],
    closing: "Que a graca do Senhor Jesus Cristo, o amor de Deus e a comunhao do Espirito Santo estejam com voce. (2 Corintios 13, 13)",
};

/// Returns the compiled-in prayer guide.
pub fn guide() -> &'static Document<'static> {
    &GUIDE
}

impl Document<'_> {
    /// Numbered heading for the chapter at zero-based `index`.
    pub fn chapter_heading(&self, index: usize) -> Option<String> {
        self.chapters
            .get(index)
            .map(|chapter| format!("Capitulo {}: {}", index + 1, chapter.title))
    }
}
